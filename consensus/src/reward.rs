//! Reward outputs for a block and the arithmetic that takes them out of the
//! block's own reward.

use patriot_types::{Amount, BlockHeight, Transaction, TxOut};
use tracing::debug;

use crate::engine::VotingEngine;
use crate::error::ConsensusError;

/// Take `payment` out of the first `stake_outputs` outputs of a coinstake.
/// Output 0 is the empty marker; the stake itself sits in outputs
/// `1..stake_outputs`.
///
/// With a single stake output it pays everything. Otherwise each stake
/// output gives up `payment / (stake_outputs - 1)` and the last one also
/// gives up the remainder, so the total taken is exactly `payment`.
pub fn subtract_from_coinstake(
    coinstake: &mut Transaction,
    payment: Amount,
    stake_outputs: usize,
) -> Result<(), ConsensusError> {
    if stake_outputs < 2 || coinstake.outputs.len() < stake_outputs {
        return Err(ConsensusError::StakeOutputs {
            stake_outputs,
            have: coinstake.outputs.len(),
        });
    }
    if stake_outputs == 2 {
        coinstake.outputs[1].value -= payment;
        return Ok(());
    }

    let parts = stake_outputs - 1;
    let (share, remainder) = payment.div_rem(parts as i64);
    for out in &mut coinstake.outputs[1..=parts] {
        out.value -= share;
    }
    coinstake.outputs[parts].value -= remainder;
    Ok(())
}

/// Resolves who a block pays and writes the payment into the block's reward
/// transactions.
pub struct RewardAllocator<'a> {
    engine: &'a VotingEngine,
}

impl<'a> RewardAllocator<'a> {
    pub fn new(engine: &'a VotingEngine) -> Self {
        Self { engine }
    }

    /// Outputs due at `height`, or `None` when nobody can be paid.
    pub fn outputs_for(&self, height: BlockHeight) -> Option<Vec<TxOut>> {
        if self.engine.params().is_legacy_obsolete(height) {
            self.deterministic_outputs(height)
        } else {
            self.legacy_outputs(height)
        }
    }

    /// Payee and optional operator outputs from the deterministic registry.
    /// Zero-valued outputs are left out.
    pub fn deterministic_outputs(&self, height: BlockHeight) -> Option<Vec<TxOut>> {
        let payee = self.engine.registry().deterministic_payee(height)?;
        let mut reward = self.engine.params().patriotnode_payment(height);
        let mut operator_reward = Amount::ZERO;
        if payee.operator_reward_bps != 0 && !payee.operator_payout.is_empty() {
            operator_reward = reward.mul_bps(payee.operator_reward_bps);
            reward -= operator_reward;
        }

        let mut outputs = Vec::with_capacity(2);
        if reward.is_positive() {
            outputs.push(TxOut::new(reward, payee.payout));
        }
        if operator_reward.is_positive() {
            outputs.push(TxOut::new(operator_reward, payee.operator_payout));
        }
        Some(outputs)
    }

    /// The voted payee for `height`, or the registry's pick when no vote
    /// reached it.
    pub fn legacy_outputs(&self, height: BlockHeight) -> Option<Vec<TxOut>> {
        let payee = match self.engine.payee_for(height) {
            Some(payee) => payee,
            None => match self.engine.registry().current_best_payee(height) {
                Some(payee) => payee,
                None => {
                    debug!(height, "failed to detect patriotnode to pay");
                    return None;
                }
            },
        };
        let amount = self.engine.params().patriotnode_payment(height);
        Some(vec![TxOut::new(amount, payee)])
    }

    /// Append the patriotnode payment for `height` and subtract it from the
    /// block reward. Returns `false` when nobody could be paid.
    ///
    /// Before v6.0 a proof-of-stake block pays from its coinstake. From v6.0
    /// the payment goes into the coinbase, which a proof-of-stake block
    /// clears first; the stake outputs still fund it.
    pub fn fill(
        &self,
        coinbase: &mut Transaction,
        coinstake: &mut Transaction,
        height: BlockHeight,
        is_proof_of_stake: bool,
    ) -> Result<bool, ConsensusError> {
        let Some(outputs) = self.outputs_for(height) else {
            return Ok(false);
        };
        let params = self.engine.params();
        let pay_coinstake = is_proof_of_stake && !params.is_v6_active(height);
        if is_proof_of_stake && !pay_coinstake {
            coinbase.outputs.clear();
        }

        let stake_outputs = coinstake.outputs.len();
        let mut payment = Amount::ZERO;
        for out in outputs {
            debug!(height, amount = %out.value, payee = %out.script, "patriotnode payment");
            payment += out.value;
            if pay_coinstake {
                coinstake.outputs.push(out);
            } else {
                coinbase.outputs.push(out);
            }
        }

        if is_proof_of_stake {
            subtract_from_coinstake(coinstake, payment, stake_outputs)?;
        } else {
            let first = coinbase
                .outputs
                .first_mut()
                .ok_or(ConsensusError::EmptyCoinbase)?;
            first.value = params.block_value_at(height) - payment;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patriot_types::Script;

    fn coinstake(values: &[i64]) -> Transaction {
        let mut outputs = vec![TxOut::empty()];
        outputs.extend(
            values
                .iter()
                .map(|v| TxOut::new(Amount::new(*v), Script::new(vec![0x51]))),
        );
        Transaction::coinstake(outputs)
    }

    fn values(tx: &Transaction) -> Vec<i64> {
        tx.outputs.iter().map(|o| o.value.units()).collect()
    }

    #[test]
    fn single_stake_output_pays_all() {
        let mut tx = coinstake(&[1000]);
        subtract_from_coinstake(&mut tx, Amount::new(300), 2).unwrap();
        assert_eq!(values(&tx), vec![0, 700]);
    }

    #[test]
    fn split_puts_remainder_on_last() {
        let mut tx = coinstake(&[1000, 1000, 1000]);
        subtract_from_coinstake(&mut tx, Amount::new(100), 4).unwrap();
        assert_eq!(values(&tx), vec![0, 967, 967, 966]);
    }

    #[test]
    fn appended_outputs_are_untouched() {
        let mut tx = coinstake(&[1000, 1000]);
        tx.outputs.push(TxOut::new(Amount::new(50), Script::new(vec![0x52])));
        subtract_from_coinstake(&mut tx, Amount::new(50), 3).unwrap();
        assert_eq!(values(&tx), vec![0, 975, 975, 50]);
    }

    #[test]
    fn too_few_outputs_is_an_error() {
        let mut tx = coinstake(&[]);
        assert!(subtract_from_coinstake(&mut tx, Amount::new(1), 1).is_err());
        assert!(subtract_from_coinstake(&mut tx, Amount::new(1), 2).is_err());
    }
}
