//! Turns a resolved round into the response payload.

use super::{
    bye::{ByeAssigner, WithdrawalBye},
    colour::ColourAllocator,
    resolver::ResolvedRound,
};
use crate::tournament::{EmptyTable, Pairing};

/// Numbers tables and attaches byes
pub struct ResultAssembler {
    colours: ColourAllocator,
}

impl ResultAssembler {
    pub fn new(round_no: u32) -> Self {
        Self {
            colours: ColourAllocator::new(round_no),
        }
    }

    /// Tables are numbered from 1 in resolution order; withdrawal-byes (by
    /// starting number) and then the pairing-bye continue the numbering.
    pub fn assemble(
        &self,
        round: &ResolvedRound<'_>,
        withdrawals: &[WithdrawalBye],
        byes: &ByeAssigner,
    ) -> Pairing {
        let tables: Vec<_> = round
            .pairs
            .iter()
            .zip(1u32..)
            .map(|(&(higher, lower), table_no)| {
                self.colours.allocate(higher, lower).into_table(table_no)
            })
            .collect();

        let mut withdrawals = withdrawals.to_vec();
        withdrawals.sort_by_key(|w| w.start_no);
        let withdrawal_tables = withdrawals.iter().map(|w| (w.start_no, w.bye()));
        let pairing_bye = round.bye.map(|card| (card.start_no, byes.bye()));

        let first_empty = tables.len() as u32 + 1;
        let empty_tables = withdrawal_tables
            .chain(pairing_bye)
            .zip(first_empty..)
            .map(|((start_no, bye), table_no)| EmptyTable {
                table_no,
                start_no,
                bye,
            })
            .collect();

        Pairing {
            tables,
            empty_tables,
        }
    }
}
