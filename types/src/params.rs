//! Payment-voting parameters.
//!
//! Every constant the voting core consults lives here so that tests and
//! alternative networks can tune them in one place. Upgrade activation is a
//! pure function of height: nothing caches "is the upgrade active" state.

use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::network::NetworkId;
use crate::transaction::BlockHeight;
use crate::version::MessageVersion;

/// Height sentinel for an upgrade that never activates.
pub const NEVER: BlockHeight = BlockHeight::MAX;

/// All parameters of the payment-voting subsystem.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentParams {
    // ── Quorum ───────────────────────────────────────────────────────────
    /// Minimum votes for a destination to bind a height.
    pub required_votes: u32,

    /// Number of top-ranked nodes allowed to vote for a height.
    pub quorum_size: u32,

    /// Ranks are taken this many blocks below the voted height.
    pub rank_lookback: BlockHeight,

    // ── Windows ──────────────────────────────────────────────────────────
    /// How far past the tip a vote may target.
    pub future_window: BlockHeight,

    /// Minimum number of heights retained behind the tip by cleanup.
    pub retention_floor: BlockHeight,

    /// Blocks past the tip checked by `is_scheduled`.
    pub schedule_lookahead: BlockHeight,

    /// A new tip at height `h` triggers the self-vote for `h + self_vote_offset`.
    pub self_vote_offset: BlockHeight,

    // ── Messages ─────────────────────────────────────────────────────────
    /// Oldest vote message version still accepted.
    pub mandated_message_version: MessageVersion,

    /// Peers below this protocol version are ignored.
    pub min_peer_protocol_version: u32,

    /// Reputation penalty for protocol violations.
    pub misbehavior_score: u32,

    /// Seen-counter cap used by sync progress tracking.
    pub sync_seen_threshold: u8,

    // ── Rewards ──────────────────────────────────────────────────────────
    /// Amount paid to the winning patriotnode each block.
    pub patriotnode_reward: Amount,

    /// Total newly minted value of a block.
    pub block_value: Amount,

    /// Length of a governance budget cycle; superblocks open each cycle.
    pub budget_cycle_blocks: BlockHeight,

    // ── Upgrades ─────────────────────────────────────────────────────────
    /// Proof-of-stake activation.
    pub pos_activation_height: BlockHeight,

    /// From this height a negative mint invalidates the block value.
    pub v5_3_activation_height: BlockHeight,

    /// From this height service-node payments go to the coinbase.
    pub v6_activation_height: BlockHeight,

    /// Deterministic registration supersedes the legacy node list here.
    pub deterministic_activation_height: BlockHeight,
}

impl PaymentParams {
    /// Parameters for a given network.
    pub fn for_network(network: NetworkId) -> Self {
        match network {
            NetworkId::Main => Self::default(),
            NetworkId::Test | NetworkId::Regtest => Self {
                budget_cycle_blocks: 144,
                ..Self::default()
            },
        }
    }

    /// `floor(1.25 * enabled)`: the vote backlog sized from the enabled count.
    pub fn scaled_enabled(&self, enabled: u32) -> BlockHeight {
        (u64::from(enabled) * 5 / 4).min(u64::from(BlockHeight::MAX)) as BlockHeight
    }

    /// Number of heights behind the tip that cleanup keeps.
    pub fn retention_window(&self, enabled: u32) -> BlockHeight {
        self.scaled_enabled(enabled).max(self.retention_floor)
    }

    /// Lowest height a vote may target with the given tip and enabled count.
    pub fn first_acceptable_height(&self, tip: BlockHeight, enabled: u32) -> BlockHeight {
        tip.saturating_sub(self.scaled_enabled(enabled))
    }

    /// Highest height a vote may target with the given tip.
    pub fn last_acceptable_height(&self, tip: BlockHeight) -> BlockHeight {
        tip.saturating_add(self.future_window)
    }

    /// Height at which a voter's rank is evaluated for a vote at `height`.
    pub fn rank_height(&self, height: BlockHeight) -> BlockHeight {
        height.saturating_sub(self.rank_lookback)
    }

    pub fn patriotnode_payment(&self, _height: BlockHeight) -> Amount {
        self.patriotnode_reward
    }

    pub fn block_value_at(&self, _height: BlockHeight) -> Amount {
        self.block_value
    }

    pub fn is_pos_active(&self, height: BlockHeight) -> bool {
        height >= self.pos_activation_height
    }

    pub fn is_v5_3_active(&self, height: BlockHeight) -> bool {
        height >= self.v5_3_activation_height
    }

    pub fn is_v6_active(&self, height: BlockHeight) -> bool {
        height >= self.v6_activation_height
    }

    /// Whether the legacy node list and its payment votes are obsolete.
    pub fn is_legacy_obsolete(&self, height: BlockHeight) -> bool {
        height >= self.deterministic_activation_height
    }

    /// Whether block payments for `height` go into the coinstake rather than
    /// the coinbase.
    pub fn pays_coinstake(&self, height: BlockHeight) -> bool {
        self.is_pos_active(height) && !self.is_v6_active(height)
    }

    /// Whether `height` falls in the first 100 blocks of a budget cycle.
    pub fn is_budget_window(&self, height: BlockHeight) -> bool {
        self.budget_cycle_blocks > 0 && height % self.budget_cycle_blocks < 100
    }
}

impl Default for PaymentParams {
    fn default() -> Self {
        Self {
            required_votes: 6,
            quorum_size: 10,
            rank_lookback: 100,
            future_window: 20,
            retention_floor: 1000,
            schedule_lookahead: 8,
            self_vote_offset: 10,
            mandated_message_version: MessageVersion::HashSigned,
            min_peer_protocol_version: 70_923,
            misbehavior_score: 20,
            sync_seen_threshold: 2,
            patriotnode_reward: Amount::from_coins(3),
            block_value: Amount::from_coins(5),
            budget_cycle_blocks: 43_200,
            pos_activation_height: 201,
            v5_3_activation_height: NEVER,
            v6_activation_height: NEVER,
            deterministic_activation_height: NEVER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_enabled_floors() {
        let p = PaymentParams::default();
        assert_eq!(p.scaled_enabled(40), 50);
        assert_eq!(p.scaled_enabled(3), 3);
        assert_eq!(p.scaled_enabled(0), 0);
    }

    #[test]
    fn retention_window_has_floor() {
        let p = PaymentParams::default();
        assert_eq!(p.retention_window(40), 1000);
        assert_eq!(p.retention_window(2000), 2500);
    }

    #[test]
    fn acceptance_window_saturates() {
        let p = PaymentParams::default();
        assert_eq!(p.first_acceptable_height(10, 40), 0);
        assert_eq!(p.first_acceptable_height(1000, 40), 950);
        assert_eq!(p.last_acceptable_height(1000), 1020);
        assert_eq!(p.last_acceptable_height(BlockHeight::MAX), BlockHeight::MAX);
    }

    #[test]
    fn upgrade_checks_are_height_functions() {
        let p = PaymentParams {
            pos_activation_height: 10,
            v6_activation_height: 20,
            deterministic_activation_height: 30,
            ..PaymentParams::default()
        };
        assert!(!p.pays_coinstake(9));
        assert!(p.pays_coinstake(10));
        assert!(!p.pays_coinstake(20));
        assert!(!p.is_legacy_obsolete(29));
        assert!(p.is_legacy_obsolete(30));
    }

    #[test]
    fn budget_window_is_start_of_cycle() {
        let p = PaymentParams::for_network(NetworkId::Test);
        assert!(p.is_budget_window(144));
        assert!(p.is_budget_window(243));
        assert!(!p.is_budget_window(244));
    }
}
