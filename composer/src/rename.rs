// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Register rename planning.
//!
//! When an edge connects two apps that hold the same variable in different
//! registers, the wiring rule has to move values around before the transfer.
//! Moves cannot simply be emitted in declaration order: one move may clobber
//! a register a later move still reads. The requirement is an injective
//! partial map over the register file, so it decomposes into chains (safe to
//! emit as plain moves, furthest destination first) and cycles (rotated
//! through the per-packet scratch stack, one push/pop round-trip per cycle,
//! correct for any cycle length).

use openflow::{Action, Register};
use ordermap::OrderMap;

/// Plan the action sequence realizing the given register moves.
///
/// `moves` holds `(src, dst)` pairs: after the emitted actions run, `dst`
/// carries the value `src` held before. Destinations are pairwise distinct
/// (a register assignment holds one variable per register); one source may
/// feed several destinations. Identity pairs are ignored. The plan is
/// deterministic for a given move order.
#[must_use]
pub fn plan_renames(moves: &[(Register, Register)]) -> Vec<Action> {
    let mut pending: OrderMap<Register, Register> = moves
        .iter()
        .filter(|(src, dst)| src != dst)
        .map(|&(src, dst)| (dst, src))
        .collect();

    let mut actions = Vec::new();

    // Chains: a destination whose old value nobody still reads can be
    // overwritten in place. Peeling repeats until only cycles remain.
    loop {
        let Some(dst) = pending
            .keys()
            .copied()
            .find(|dst| !pending.values().any(|src| src == dst))
        else {
            break;
        };
        let Some(src) = pending.remove(&dst) else {
            break;
        };
        actions.push(Action::CopyRegister { src, dst });
    }

    // Cycles: save the first member on the scratch stack, shift the rest
    // along the cycle, pop into the last slot.
    while let Some(first) = pending.keys().next().copied() {
        actions.push(Action::PushRegister(first));
        let mut dst = first;
        while let Some(src) = pending.remove(&dst) {
            if src == first {
                actions.push(Action::PopRegister(dst));
                break;
            }
            actions.push(Action::CopyRegister { src, dst });
            dst = src;
        }
    }

    actions
}

#[allow(clippy::unwrap_used, clippy::panic)]
#[cfg(test)]
mod tests {
    use super::*;
    use ordermap::OrderSet;
    use pretty_assertions::assert_eq;

    /// Symbolically execute `plan_renames(moves)` over a register file
    /// seeded with distinct values and check that every destination ends up
    /// with its source's original value, untouched registers keep theirs,
    /// and the scratch stack balances.
    fn check_plan(moves: &[(Register, Register)]) -> Vec<Action> {
        let actions = plan_renames(moves);

        let initial: OrderMap<Register, u64> = Register::POOL
            .into_iter()
            .enumerate()
            .map(|(n, reg)| (reg, n as u64))
            .collect();
        let mut regs = initial.clone();
        let mut stack: Vec<u64> = Vec::new();

        for action in &actions {
            match action {
                Action::PushRegister(reg) => stack.push(regs[reg]),
                Action::PopRegister(reg) => {
                    let value = stack.pop().unwrap();
                    regs.insert(*reg, value);
                }
                Action::CopyRegister { src, dst } => {
                    let value = regs[src];
                    regs.insert(*dst, value);
                }
                other => panic!("planner emitted unexpected action {other}"),
            }
        }
        assert!(stack.is_empty(), "unbalanced scratch stack");

        let dsts: OrderSet<Register> = moves
            .iter()
            .filter(|(src, dst)| src != dst)
            .map(|&(_, dst)| dst)
            .collect();
        for &(src, dst) in moves {
            assert_eq!(regs[&dst], initial[&src], "{src} -> {dst} lost its value");
        }
        for reg in Register::POOL {
            if !dsts.contains(&reg) {
                assert_eq!(regs[&reg], initial[&reg], "{reg} clobbered");
            }
        }
        actions
    }

    #[test]
    fn empty_and_identity_moves_need_no_actions() {
        assert_eq!(check_plan(&[]), vec![]);
        assert_eq!(check_plan(&[(Register::Reg1, Register::Reg1)]), vec![]);
    }

    #[test]
    fn single_move_is_one_copy() {
        let actions = check_plan(&[(Register::Reg6, Register::Reg3)]);
        assert_eq!(
            actions,
            vec![Action::CopyRegister {
                src: Register::Reg6,
                dst: Register::Reg3,
            }]
        );
    }

    #[test]
    fn chain_moves_furthest_destination_first() {
        // reg0 -> reg1 -> reg2: reg2 must be written before reg1 is.
        let actions = check_plan(&[
            (Register::Reg0, Register::Reg1),
            (Register::Reg1, Register::Reg2),
        ]);
        assert_eq!(
            actions,
            vec![
                Action::CopyRegister {
                    src: Register::Reg1,
                    dst: Register::Reg2,
                },
                Action::CopyRegister {
                    src: Register::Reg0,
                    dst: Register::Reg1,
                },
            ]
        );
    }

    #[test]
    fn swap_uses_one_scratch_round_trip() {
        let actions = check_plan(&[
            (Register::Reg1, Register::Reg2),
            (Register::Reg2, Register::Reg1),
        ]);
        assert_eq!(
            actions,
            vec![
                Action::PushRegister(Register::Reg2),
                Action::CopyRegister {
                    src: Register::Reg1,
                    dst: Register::Reg2,
                },
                Action::PopRegister(Register::Reg1),
            ]
        );
    }

    #[test]
    fn three_cycle_rotates_through_the_stack() {
        // reg0 -> reg1 -> reg2 -> reg0
        let actions = check_plan(&[
            (Register::Reg0, Register::Reg1),
            (Register::Reg1, Register::Reg2),
            (Register::Reg2, Register::Reg0),
        ]);
        // one push, cycle-length-minus-one copies, one pop
        assert_eq!(actions.len(), 4);
        assert!(matches!(actions[0], Action::PushRegister(_)));
        assert!(matches!(actions[3], Action::PopRegister(_)));
    }

    #[test]
    fn value_fanning_out_to_chain_and_swap() {
        // reg0 <-> reg1 swap, with reg1's old value also needed in reg5
        check_plan(&[
            (Register::Reg0, Register::Reg1),
            (Register::Reg1, Register::Reg0),
            (Register::Reg1, Register::Reg5),
        ]);
    }

    #[test]
    fn disjoint_cycles_each_get_their_own_round_trip() {
        let actions = check_plan(&[
            (Register::Reg0, Register::Reg1),
            (Register::Reg1, Register::Reg0),
            (Register::Reg2, Register::Reg3),
            (Register::Reg3, Register::Reg2),
        ]);
        let pushes = actions
            .iter()
            .filter(|a| matches!(a, Action::PushRegister(_)))
            .count();
        assert_eq!(pushes, 2);
    }

    #[test]
    fn generated_rotations_preserve_every_value() {
        bolero::check!().with_type().for_each(|seed: &[u8; 16]| {
            let mut pool = Register::POOL;
            for i in (1..pool.len()).rev() {
                let j = usize::from(seed[i % seed.len()]) % (i + 1);
                pool.swap(i, j);
            }
            let k = usize::from(seed[15]) % (pool.len() + 1);
            let moves: Vec<(Register, Register)> =
                (0..k).map(|i| (pool[i], pool[(i + 1) % k])).collect();
            check_plan(&moves);
        });
    }
}
