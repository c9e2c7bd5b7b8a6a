//! Property tests for registration and dispatch counts.
//!
//! Random hook names and registration plans are generated with `proptest`;
//! the observed invocation counts must match what the dispatch rules
//! predict.


use proptest::prelude::*;
use test_utils::Recorder;
use wirehook_emitter::Emitter;

/// Hook names drawn from a small alphabet so plans reuse names.
fn arb_hook() -> impl Strategy<Value = String> {
    "[a-c]{0,2}"
}

/// One registration: the hook name and whether it was made with `once`.
fn arb_plan() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::vec((arb_hook(), any::<bool>()), 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// `on(H, C)` then `fire(H)` invokes `C` once with the owner as context.
    #[test]
    fn prop_on_fire_invokes_once(hook in arb_hook()) {
        let emitter = Emitter::new();
        let recorder = Recorder::new();

        emitter.on(hook.clone(), recorder.callback());
        emitter.fire(&hook).unwrap();

        prop_assert_eq!(recorder.contexts(), vec![emitter.id().clone()]);
    }

    /// Firing every hook twice runs `on` registrations twice and `once`
    /// registrations once.
    #[test]
    fn prop_fire_counts_match_plan(plan in arb_plan()) {
        let emitter = Emitter::new();
        let recorder = Recorder::new();

        for (hook, once) in &plan {
            if *once {
                emitter.once(hook.clone(), recorder.callback());
            } else {
                emitter.on(hook.clone(), recorder.callback());
            }
        }

        let mut hooks: Vec<&String> = plan.iter().map(|(hook, _)| hook).collect();
        hooks.sort();
        hooks.dedup();
        for hook in &hooks {
            emitter.fire(hook).unwrap();
            emitter.fire(hook).unwrap();
        }

        let expected: usize = plan
            .iter()
            .map(|(_, once)| if *once { 1 } else { 2 })
            .sum();
        prop_assert_eq!(recorder.count(), expected);

        let remaining: usize = hooks.iter().map(|hook| emitter.hook_count(hook)).sum();
        let persistent = plan.iter().filter(|(_, once)| !*once).count();
        prop_assert_eq!(remaining, persistent);
    }

    /// Each of `sources` emitters wired to one target contributes one
    /// invocation per target callback.
    #[test]
    fn prop_fan_in_multiplies(sources in 1usize..5, callbacks in 0usize..4) {
        let target = Emitter::new();
        let recorder = Recorder::new();
        for _ in 0..callbacks {
            target.on("h", recorder.callback());
        }

        let emitters: Vec<Emitter> = (0..sources).map(|_| Emitter::new()).collect();
        for source in &emitters {
            source.wire(&target);
            source.fire("h").unwrap();
        }

        prop_assert_eq!(recorder.count(), sources * callbacks);
    }

    /// `events` is idempotent and lists hooks in first-registration order.
    #[test]
    fn prop_events_idempotent(plan in arb_plan()) {
        let emitter = Emitter::new();
        let recorder = Recorder::new();
        for (hook, _) in &plan {
            emitter.on(hook.clone(), recorder.callback());
        }

        let first = emitter.events();
        prop_assert_eq!(&first, &emitter.events());

        let mut order: Vec<&String> = Vec::new();
        for (hook, _) in &plan {
            if !order.contains(&hook) {
                order.push(hook);
            }
        }
        prop_assert_eq!(first.keys().collect::<Vec<_>>(), order);
    }
}
