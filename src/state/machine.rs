//! Middleware driving a chain from a persisted state.

use super::stack::State;
use super::step::Step;
use super::store::Store;
use super::transition::bind;
use crate::core::{Context, Middleware};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Produces the store for one call from that call's context.
pub type StoreFactory = Arc<dyn Fn(&Context) -> Box<dyn Store> + Send + Sync>;

/// Drive the wrapped chain from the state held by the store `factory`
/// returns for each call.
///
/// On every invocation the middleware loads the state, binds it as the
/// current state, runs the continuation, and persists the requested state
/// when the chain returns [`Step::Transition`]. A load failure aborts before
/// the chain runs. Failures and `Step::Stay` never touch the store.
///
/// Use [`MachineBuilder`](crate::builder::MachineBuilder) to also provide an
/// initial state or a name for log events.
pub fn machine<F, S>(factory: F) -> Middleware<Step>
where
    F: Fn(&Context) -> S + Send + Sync + 'static,
    S: Store + 'static,
{
    drive(
        Arc::new(move |ctx| Box::new(factory(ctx)) as Box<dyn Store>),
        None,
        Cow::Borrowed("machine"),
    )
}

pub(crate) fn drive(
    factory: StoreFactory,
    initial: Option<State>,
    name: Cow<'static, str>,
) -> Middleware<Step> {
    Middleware::new(move |ctx, next| {
        let store = factory(ctx);
        let loaded = store
            .get()
            .inspect_err(|e| warn!(machine = %name, error = %e, "failed to load state"))?
            .or_else(|| initial.clone());
        debug!(
            machine = %name,
            state = loaded.as_ref().map(State::key),
            "loaded state"
        );

        let step = next.call(&bind(ctx, loaded))?;
        if let Step::Transition(target) = &step {
            debug!(
                machine = %name,
                next = target.as_ref().map(State::key),
                "persisting transition"
            );
            store
                .set(target.clone())
                .inspect_err(|e| warn!(machine = %name, error = %e, "failed to persist state"))?;
        }
        Ok(step)
    })
}
