//! Account-connection state shown by the connect page.
//!
//! One enum replaces independent "link present / form completed / fallback shown" flags,
//! so only the combinations below are reachable.

use serde::{Deserialize, Serialize};
use utility_client::domain::{Customer, CustomerId, CustomerState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectState {
    NotStarted,
    /// Customer exists; the user still has to enter utility credentials at the onboarding link.
    AwaitingOnboarding {
        customer_id: CustomerId,
        onboarding_link: String,
    },
    /// The user says the form is done; waiting for the aggregator to confirm bills.
    Verifying { customer_id: CustomerId },
    /// The user chose to continue without a connected account.
    Fallback,
    Ready { customer_id: CustomerId },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConnectEvent {
    CustomerCreated {
        customer_id: CustomerId,
        onboarding_link: String,
    },
    FormCompleted,
    StatusChecked { bills_ready: bool },
    Failed,
    ContinueWithoutConnecting,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("event {event:?} is not valid in state {state:?}")]
pub struct InvalidTransition {
    pub state: ConnectState,
    pub event: ConnectEvent,
}

impl ConnectState {
    pub fn transition(self, event: ConnectEvent) -> Result<ConnectState, InvalidTransition> {
        use ConnectEvent as E;
        use ConnectState as S;

        match (self, event) {
            (S::NotStarted, E::CustomerCreated { customer_id, onboarding_link }) => Ok(S::AwaitingOnboarding {
                customer_id,
                onboarding_link,
            }),
            (S::AwaitingOnboarding { customer_id, .. }, E::FormCompleted) => Ok(S::Verifying { customer_id }),
            (S::Verifying { customer_id }, E::StatusChecked { bills_ready: true }) => Ok(S::Ready { customer_id }),
            (state @ S::Verifying { .. }, E::StatusChecked { bills_ready: false }) => Ok(state),
            // A failure keeps the current state; the page offers "continue without connecting".
            (state @ (S::NotStarted | S::AwaitingOnboarding { .. } | S::Verifying { .. }), E::Failed) => Ok(state),
            (S::NotStarted | S::AwaitingOnboarding { .. } | S::Verifying { .. }, E::ContinueWithoutConnecting) => {
                Ok(S::Fallback)
            }
            (state, event) => Err(InvalidTransition { state, event }),
        }
    }

    /// Where an aggregator customer record places the connect page.
    pub fn for_customer(customer: &Customer) -> ConnectState {
        let customer_id = customer.id.clone();
        match customer.state() {
            CustomerState::BillsReady => Self::Ready { customer_id },
            CustomerState::BillsProcessing => Self::Verifying { customer_id },
            CustomerState::Created | CustomerState::AwaitingCredentials => match &customer.onboarding_link {
                Some(link) => Self::AwaitingOnboarding {
                    customer_id,
                    onboarding_link: link.clone(),
                },
                None => Self::Verifying { customer_id },
            },
        }
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        match self {
            Self::AwaitingOnboarding { customer_id, .. } | Self::Verifying { customer_id } | Self::Ready { customer_id } => {
                Some(customer_id)
            }
            Self::NotStarted | Self::Fallback => None,
        }
    }
}
