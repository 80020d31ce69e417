use std::sync::Arc;
use uuid::Uuid;

use crate::sqn::SequenceNumberManager;
use crate::types::auth_event_store::AuthEventStore;
use crate::types::subscriber_store::SubscriberStore;

#[derive(Clone)]
pub struct AppState {
    pub subscriber_store: Arc<SubscriberStore>,
    pub auth_event_store: Arc<AuthEventStore>,
    pub sqn_manager: Arc<SequenceNumberManager>,
    pub nf_instance_id: Uuid,
}
