use core::marker::PhantomData;
use wirehook_emitter::{Emitter, Params, hooks};

/// `#[hooks]` carries the impl block's generics over to the generated impl.
struct Queue<T> {
    _items: PhantomData<T>,
}

#[hooks]
impl<T: Send + 'static> Queue<T> {
    #[on("drained")]
    fn drained(_emitter: &Emitter, _params: Params) {}
}

fn main() {
    let emitter = Emitter::of::<Queue<String>>();
    emitter.fire("drained").unwrap();
}
