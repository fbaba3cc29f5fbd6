//! The edit budget stays within bounds under arbitrary command sequences.

use makeitmeme_common::error::MemeError;
use makeitmeme_edit_engine::{EditCommand, EditSession, RandomPicker, SessionState, MAX_EDITS};
use makeitmeme_feed_model::AssetId;
use proptest::prelude::*;

fn command() -> impl Strategy<Value = EditCommand> {
    prop_oneof![
        "[a-z ]{0,12}".prop_map(EditCommand::SetTopText),
        "[a-z ]{0,12}".prop_map(EditCommand::SetBottomText),
        Just(EditCommand::RequestSwap),
    ]
}

proptest! {
    #[test]
    fn budget_never_leaves_bounds(
        commands in prop::collection::vec(command(), 0..40),
        pool_size in 1usize..5,
        seed in any::<u64>(),
    ) {
        let pool: Vec<AssetId> = (0..pool_size).map(|i| AssetId::new(format!("m{i}"))).collect();
        let mut picker = RandomPicker::seeded(seed);
        let mut session = EditSession::new(pool[0].clone());

        for command in commands {
            let is_swap = command == EditCommand::RequestSwap;
            let before = session.clone();
            let (next, result) = session.apply(command, &pool, &mut picker);

            prop_assert!(next.edits_remaining() <= MAX_EDITS);
            match result {
                Ok(_) if is_swap => {
                    prop_assert_eq!(next.edits_remaining() + 1, before.edits_remaining());
                    prop_assert_ne!(next.asset_id(), before.asset_id());
                }
                Ok(_) => prop_assert_eq!(next.edits_remaining(), before.edits_remaining()),
                Err(MemeError::BudgetExhausted) => {
                    prop_assert_eq!(before.state(), SessionState::Locked);
                    prop_assert_eq!(&next, &before);
                }
                Err(MemeError::NoAlternative) => {
                    prop_assert_eq!(pool_size, 1);
                    prop_assert_eq!(&next, &before);
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
            session = next;
        }
    }
}
