//! Signup Wizard
//!
//! This example drives a multi-step form from a persisted state stack.
//!
//! Key concepts:
//! - Loading and persisting state through a store
//! - Dispatching on the current state with `on` + `matches`
//! - Pushing screens and popping back
//! - Carrying form data in the state payload
//!
//! Run with: cargo run --example wizard

use serde::{Deserialize, Serialize};
use waypoint::builder::MachineBuilder;
use waypoint::core::{and, Context, Error, Handler, Middleware, Predicate};
use waypoint::state::{self, MemoryStore, State, StateSource, Step};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Signup {
    email: Option<String>,
    plan: Option<String>,
}

fn input(ctx: &Context) -> &str {
    ctx.value::<String>("input").map(String::as_str).unwrap_or("")
}

fn says(word: &'static str) -> Predicate {
    Predicate::new(move |ctx| input(ctx) == word)
}

fn form(ctx: &Context) -> Result<Signup, Error> {
    match state::current(ctx) {
        Some(s) if !s.payload().is_empty() => s.value(),
        _ => Ok(Signup::default()),
    }
}

/// Push `key` carrying the form updated by `update`.
fn advance(key: &'static str, update: fn(&mut Signup, &str)) -> Handler<Step> {
    state::push(StateSource::computed(move |ctx| {
        let mut signup = form(ctx)?;
        update(&mut signup, input(ctx));
        Ok(Some(State::new(key).with_value(&signup)?))
    }))
    .then(Handler::none())
}

fn main() {
    println!("=== Signup Wizard ===\n");

    let store = MemoryStore::new();
    let machine = MachineBuilder::new()
        .name("signup")
        .initial(State::new("email"))
        .store({
            let store = store.clone();
            move |_| store.clone()
        })
        .build()
        .expect("store factory is set");

    let screens = Middleware::identity()
        .on(says("back"), state::pop().then(Handler::none()))
        .on(
            state::matches("email"),
            advance("plan", |s, input| s.email = Some(input.to_string())),
        )
        .on(
            state::matches("plan"),
            advance("confirm", |s, input| s.plan = Some(input.to_string())),
        )
        .on(
            and([state::matches("confirm"), says("yes")]),
            state::next("done").then(Handler::none()),
        );

    let wizard = Handler::new(|_: &Context| Ok(Step::Stay)).using([machine, screens]);

    for line in ["ada@example.com", "free", "back", "pro", "yes"] {
        let ctx = Context::new().with_value("input", line.to_string());
        match wizard.call(&ctx) {
            Ok(step) => {
                let at = step.target().map(State::key).unwrap_or("(unchanged)");
                println!("  {:<16} -> {}", line, at);
            }
            Err(e) => println!("  {:<16} !! {}", line, e),
        }
    }

    let done = store.current().expect("wizard finished");
    println!("\nFinal state: {}", done);
    println!("Transitions stored: {}", store.log().len());

    println!("\n=== Example Complete ===");
}
