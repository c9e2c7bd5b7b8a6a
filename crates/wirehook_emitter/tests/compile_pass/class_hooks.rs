use wirehook_emitter::{Emitter, HookClass, HookError, Params, hooks};

struct Mailer;

/// Marked functions may return `()` or `Result<(), HookError>`.
#[hooks]
impl Mailer {
    #[on("sent")]
    fn log_sent(_emitter: &Emitter, _params: Params) {}

    #[once("bounced")]
    #[on("deferred")]
    fn retry(_emitter: &Emitter, params: Params) -> Result<(), HookError> {
        let _attempts: u32 = params.deserialize()?;
        Ok(())
    }

    pub fn unmarked(&self) -> u32 {
        7
    }
}

fn assert_hook_class<T: HookClass>() {}

fn main() {
    assert_hook_class::<Mailer>();

    let emitter = Emitter::of::<Mailer>();
    assert_eq!(emitter.hook_count("sent"), 1);
    assert_eq!(emitter.hook_count("bounced"), 1);
    assert_eq!(emitter.hook_count("deferred"), 1);
    assert_eq!(Mailer.unmarked(), 7);
}
