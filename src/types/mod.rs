//! Public types for the Patter API.

mod delivery;
mod request;

pub use delivery::{Delivery, DeliveryInbox};
pub use request::{
    Category, ContextValue, GenerationRequest, Priority, RequestContext, RequestId,
    RequestOutcome, TextSource,
};

pub(crate) use delivery::{DeliverySender, delivery_channel};
