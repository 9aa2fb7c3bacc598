//! State, reducer and background execution of the checkout form.
//!
//! The reducer mutates [`state::CheckoutState`] and describes side effects as
//! [`effects::Effect`]s. The app loop hands `Effect::Async` to the
//! [`executor::TaskExecutor`], whose completions come back as actions.

pub mod effects;
pub mod executor;
pub mod reducer;
pub mod state;
