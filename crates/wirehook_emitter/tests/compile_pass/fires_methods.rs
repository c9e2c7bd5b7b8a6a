use wirehook_emitter::{Emitter, HasEmitter, HookError, fires};

struct Thermostat {
    emitter: Emitter,
    target: f64,
}

impl HasEmitter for Thermostat {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}

#[derive(Debug)]
enum ThermostatError {
    OutOfRange,
    Hook(HookError),
}

impl From<HookError> for ThermostatError {
    fn from(err: HookError) -> Self {
        Self::Hook(err)
    }
}

impl Thermostat {
    /// Unit methods send their arguments.
    #[fires("set")]
    pub fn set(&mut self, mut target: f64) {
        target = target.clamp(5.0, 30.0);
        self.target = target;
    }

    /// Value-returning methods send the value.
    #[fires("read")]
    #[must_use]
    pub fn read(&self) -> f64 {
        self.target
    }

    /// Fallible methods fire on `Ok` and convert dispatch errors.
    #[fires("raised")]
    pub fn raise(&mut self, by: f64) -> Result<f64, ThermostatError> {
        if by < 0.0 {
            return Err(ThermostatError::OutOfRange);
        }
        self.target += by;
        Ok(self.target)
    }

    #[fires("reset")]
    fn reset(&mut self) -> Result<(), ThermostatError> {
        self.target = 20.0;
        Ok(())
    }
}

fn main() {
    let mut thermostat = Thermostat {
        emitter: Emitter::new(),
        target: 20.0,
    };
    thermostat.set(50.0);
    assert_eq!(thermostat.read(), 30.0);
    assert!(matches!(thermostat.raise(-1.0), Err(ThermostatError::OutOfRange)));
    assert_eq!(thermostat.raise(1.0).unwrap(), 31.0);
    thermostat.reset().unwrap();
    if let Err(ThermostatError::Hook(err)) = thermostat.reset() {
        panic!("{err}");
    }
}
