//! End-to-end tests of chains driven by a persisted state.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use waypoint::builder::MachineBuilder;
use waypoint::core::{Context, Error, Handler, Middleware, Predicate};
use waypoint::state::{self, MemoryStore, State, Step, Store, StoreError};

/// Store wrapper counting reads and writes.
#[derive(Clone, Default)]
struct Counting {
    inner: MemoryStore,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
}

impl Counting {
    fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl Store for Counting {
    fn get(&self) -> Result<Option<State>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get()
    }

    fn set(&self, state: Option<State>) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(state)
    }
}

fn command(name: &'static str) -> Predicate {
    Predicate::new(move |ctx| ctx.value::<&str>("command") == Some(&name))
}

fn send(h: &Handler<Step>, name: &'static str) -> Result<Step, Error> {
    h.call(&Context::new().with_value("command", name))
}

/// Menu-driven flow: "open" pushes a screen, "back" pops, "fail" errors,
/// anything else stays put.
fn app(store: Counting) -> Handler<Step> {
    let screens = Middleware::identity()
        .on(command("open"), state::push("settings").then(Handler::none()))
        .on(command("deeper"), state::push("advanced").then(Handler::none()))
        .on(command("back"), state::pop().then(Handler::none()))
        .on(
            command("fail"),
            state::push("never").then(Handler::new(|_: &Context| Err(Error::msg("boom")))),
        );

    Handler::new(|_: &Context| Ok(Step::Stay)).using([
        MachineBuilder::new()
            .name("menu")
            .initial(State::new("home"))
            .store(move |_| store.clone())
            .build()
            .expect("store is set"),
        screens,
    ])
}

#[test]
fn transition_is_persisted_exactly_once() {
    let store = Counting::default();
    let h = app(store.clone());

    assert_eq!(send(&h, "open").unwrap().target().map(State::key), Some("settings"));
    assert_eq!(store.sets(), 1);
    assert_eq!(store.gets.load(Ordering::SeqCst), 1);
}

#[test]
fn failure_and_stay_never_persist() {
    let store = Counting::default();
    let h = app(store.clone());

    assert_eq!(send(&h, "fail").unwrap_err().to_string(), "boom");
    assert_eq!(send(&h, "noop").unwrap(), Step::Stay);
    assert_eq!(store.sets(), 0);
    assert!(store.inner.current().is_none());
}

#[test]
fn stack_round_trip_returns_to_bottom() {
    let store = Counting::default();
    let h = app(store.clone());

    send(&h, "open").unwrap();
    send(&h, "deeper").unwrap();
    assert_eq!(
        store.inner.current().unwrap().stack().map(State::key).collect::<Vec<_>>(),
        ["advanced", "settings", "home"]
    );

    send(&h, "back").unwrap();
    assert_eq!(store.inner.current().unwrap().key(), "settings");

    send(&h, "back").unwrap();
    assert_eq!(store.inner.current(), Some(State::new("home")));

    assert_eq!(
        store.inner.log().path(),
        vec![Some("settings"), Some("advanced"), Some("settings"), Some("home")]
    );
}

#[test]
fn popping_past_bottom_clears_store() {
    let store = Counting::default();
    store.inner.set(Some(State::new("home"))).unwrap();
    let h = app(store.clone());

    assert_eq!(send(&h, "back").unwrap(), Step::Transition(None));
    assert_eq!(store.inner.current(), None);
}

#[test]
fn branch_sees_loaded_state() {
    let store = MemoryStore::with_state(State::new("checkout"));
    let trace = Arc::new(Mutex::new(Vec::new()));
    let tag = |label: &'static str| {
        let trace = trace.clone();
        Middleware::new(move |ctx: &Context, next: &Handler<Step>| {
            trace.lock().push(label);
            next.call(ctx)
        })
    };

    let h = Handler::new(|_: &Context| Ok(Step::Stay)).using([
        state::machine({
            let store = store.clone();
            move |_| store.clone()
        }),
        tag("always").branch(state::matches("checkout"), [tag("checkout")]),
    ]);

    h.call(&Context::new()).unwrap();
    store.set(Some(State::new("browse"))).unwrap();
    h.call(&Context::new()).unwrap();

    assert_eq!(*trace.lock(), ["always", "checkout", "always"]);
}

#[test]
fn payload_travels_with_state() {
    let store = MemoryStore::new();
    let h = state::machine({
        let store = store.clone();
        move |_| store.clone()
    })
    .then(state::next(state::StateSource::computed(|ctx: &Context| {
        let count = state::current(ctx)
            .map(|s| s.value::<u32>())
            .transpose()?
            .unwrap_or(0);
        Ok(Some(State::new("counting").with_value(&(count + 1))?))
    }))
    .then(Handler::none()));

    for _ in 0..3 {
        h.call(&Context::new()).unwrap();
    }

    assert_eq!(store.current().unwrap().value::<u32>().unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn shared_chain_runs_concurrently() {
    let stores: Arc<Vec<MemoryStore>> = Arc::new((0..8).map(|_| MemoryStore::new()).collect());
    let h = {
        let stores = stores.clone();
        state::machine(move |ctx: &Context| {
            stores[*ctx.value::<usize>("user").unwrap_or(&0)].clone()
        })
        .then(state::push("visited").then(Handler::none()))
    };

    let tasks: Vec<_> = (0..8usize)
        .map(|user| {
            let h = h.clone();
            tokio::spawn(async move {
                for _ in 0..5 {
                    h.call(&Context::new().with_value("user", user)).unwrap();
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    for store in stores.iter() {
        assert_eq!(store.current().unwrap().depth(), 5);
        assert_eq!(store.log().len(), 5);
    }
}
