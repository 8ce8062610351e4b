// service/delivery.rs
use serde::Serialize;

use crate::{
    models::deliverymodel::{Delivery, DeliveryStatus, TimelineEvent},
    service::error::ServiceError,
};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DeliveryProgress {
    pub status: DeliveryStatus,
    /// Position on the happy path; `None` once failed or rejected.
    pub stage: Option<usize>,
    pub total_stages: usize,
    pub percent: f64,
    pub is_terminal: bool,
    pub next_status: Option<DeliveryStatus>,
}

pub fn progress(status: DeliveryStatus) -> DeliveryProgress {
    let total_stages = DeliveryStatus::PROGRESSION.len();
    let stage = status.stage_index();
    let percent = stage
        .map(|idx| idx as f64 * 100.0 / (total_stages - 1) as f64)
        .unwrap_or(0.0);

    DeliveryProgress {
        status,
        stage,
        total_stages,
        percent,
        is_terminal: status.is_terminal(),
        next_status: status.next(),
    }
}

pub fn validate_transition(
    delivery_id: &str,
    from: DeliveryStatus,
    to: DeliveryStatus,
) -> Result<(), ServiceError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(ServiceError::InvalidDeliveryTransition {
            delivery_id: delivery_id.to_string(),
            from,
            to,
        })
    }
}

/// Checks that the timeline is append-only: time never goes backwards, every
/// step is a legal transition, and it ends on the delivery's current status.
pub fn validate_timeline(delivery: &Delivery) -> Result<(), ServiceError> {
    let events: &[TimelineEvent] = &delivery.timeline;

    for pair in events.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.created_at < prev.created_at {
            return Err(ServiceError::Validation(format!(
                "Timeline for delivery {} is out of order at {:?}",
                delivery.id, next.status
            )));
        }
        validate_transition(&delivery.id, prev.status, next.status)?;
    }

    match events.last() {
        Some(last) if last.status != delivery.status => Err(ServiceError::Validation(format!(
            "Delivery {} is {:?} but its timeline ends at {:?}",
            delivery.id, delivery.status, last.status
        ))),
        _ => Ok(()),
    }
}
