//! Boundary-crossing detection between consecutive scans.
//!
//! The scanner itself is side-effect free; this tracker compares each
//! assessment with the previous one and reports which wallets crossed a
//! risk boundary, so the scan loop can invoke the dispatcher.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::{HealthMetrics, HealthStatus, WalletAddress};

use super::PositionHealth;

/// A wallet crossing a risk boundary between two scans.
#[derive(Debug, Clone)]
pub enum RiskTransition {
    /// Dropped out of the healthy band.
    EnteredAtRisk {
        wallet: WalletAddress,
        metrics: HealthMetrics,
    },
    /// Crossed below the liquidation threshold.
    BecameLiquidatable {
        wallet: WalletAddress,
        metrics: HealthMetrics,
    },
}

impl RiskTransition {
    pub fn wallet(&self) -> &WalletAddress {
        match self {
            Self::EnteredAtRisk { wallet, .. } | Self::BecameLiquidatable { wallet, .. } => wallet,
        }
    }
}

/// Tracks each wallet's last observed health band.
#[derive(Default)]
pub struct RiskTracker {
    statuses: RwLock<HashMap<WalletAddress, HealthStatus>>,
}

impl RiskTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare an assessment against the previous one and return the
    /// boundary crossings. Wallets absent from the assessment (closed or
    /// liquidated on the ledger) are forgotten so a later reappearance
    /// starts from a clean slate.
    pub fn observe(&self, assessment: &[PositionHealth]) -> Vec<RiskTransition> {
        let mut statuses = self.statuses.write();
        let mut next = HashMap::with_capacity(assessment.len());
        let mut transitions = Vec::new();

        for health in assessment {
            let wallet = health.position.owner().clone();
            let status = health.metrics.status();
            let previous = statuses.get(&wallet).copied();

            match (previous, status) {
                (prev, HealthStatus::Liquidatable) if prev != Some(HealthStatus::Liquidatable) => {
                    transitions.push(RiskTransition::BecameLiquidatable {
                        wallet: wallet.clone(),
                        metrics: health.metrics,
                    });
                }
                (prev, HealthStatus::AtRisk)
                    if prev.is_none() || prev == Some(HealthStatus::Healthy) =>
                {
                    transitions.push(RiskTransition::EnteredAtRisk {
                        wallet: wallet.clone(),
                        metrics: health.metrics,
                    });
                }
                _ => {}
            }

            next.insert(wallet, status);
        }

        *statuses = next;
        transitions
    }
}
