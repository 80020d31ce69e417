pub mod app_state;
pub mod auth_event_store;
pub mod error;
pub mod health;
pub mod identity;
pub mod problem_details;
pub mod subscriber;
pub mod subscriber_store;
pub mod ueau;

pub use app_state::AppState;
pub use auth_event_store::{AuthEventStore, StoredAuthEvent};
pub use error::AppError;
pub use identity::UeIdentity;
pub use problem_details::{InvalidParam, ProblemDetails};
pub use subscriber_store::SubscriberStore;
