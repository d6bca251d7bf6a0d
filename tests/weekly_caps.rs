//! Integration tests for the weekly meal quota and drink bounds.

use testresult::TestResult;

use larder::{
    fixtures::{sample_catalog, sample_session},
    prelude::*,
};

#[test]
fn meal_total_never_exceeds_quota_across_sequences() -> TestResult {
    let mut session = sample_session(5)?;

    // Interleave increments across meals, well past the quota.
    for _ in 0..4 {
        session.set_meal_quantity(ItemId(10), 1);
        session.set_meal_quantity(ItemId(11), 1);
        session.set_meal_quantity(ItemId(12), 1);
    }

    assert_eq!(session.total_selected_meals(), 5);
    assert_eq!(session.remaining_meals(), 0);

    Ok(())
}

#[test]
fn quota_frees_up_when_quantities_decrease() -> TestResult {
    let mut session = sample_session(3)?;

    session.set_meal_quantity(ItemId(10), 2);
    session.set_meal_quantity(ItemId(11), 1);
    assert_eq!(session.remaining_meals(), 0);

    session.set_meal_quantity(ItemId(10), -1);
    assert_eq!(session.remaining_meals(), 1);

    let refill = session.set_meal_quantity(ItemId(12), 1);
    assert_eq!(refill, Mutation::Applied { quantity: 1 });
    assert_eq!(session.total_selected_meals(), 3);

    Ok(())
}

#[test]
fn oversized_delta_is_clamped_not_rejected() -> TestResult {
    let mut session = sample_session(5)?;

    let outcome = session.set_meal_quantity(ItemId(10), 100);

    assert_eq!(outcome, Mutation::Clamped { quantity: 5 });
    assert_eq!(session.total_selected_meals(), 5);

    Ok(())
}

#[test]
fn stale_seeded_quantities_can_only_shrink() -> TestResult {
    let mut session = sample_session(5)?;

    // A draft persisted under a larger plan.
    session.seed(&SelectionSeed {
        meals: vec![(ItemId(10), 7)],
        drinks: Vec::new(),
        free_desserts: Vec::new(),
    });

    assert_eq!(session.total_selected_meals(), 7);
    assert_eq!(session.remaining_meals(), 0);

    let increase = session.set_meal_quantity(ItemId(10), 1);
    assert_eq!(increase, Mutation::Clamped { quantity: 5 });
    assert_eq!(session.total_selected_meals(), 5);

    Ok(())
}

#[test]
fn zero_quantity_entries_are_never_kept() -> TestResult {
    let mut session = sample_session(5)?;

    session.set_meal_quantity(ItemId(10), 2);
    session.set_meal_quantity(ItemId(10), -2);
    session.set_drink_quantity(ItemId(7), 1);
    session.set_drink_quantity(ItemId(7), -5);

    assert!(session.selected_meals().is_empty());
    assert!(session.selected_drinks().is_empty());

    Ok(())
}

#[test]
fn drinks_are_unbounded_above_zero() -> TestResult {
    let mut session = sample_session(1)?;

    let outcome = session.set_drink_quantity(ItemId(8), 24);

    assert_eq!(outcome, Mutation::Applied { quantity: 24 });
    assert_eq!(session.selected_drinks().total(), 24);

    Ok(())
}

#[test]
fn unknown_ids_never_mutate_state() -> TestResult {
    let mut session = sample_session(5)?;

    assert_eq!(
        session.set_meal_quantity(ItemId(404), 1),
        Mutation::Rejected(RejectReason::UnknownMeal(ItemId(404)))
    );
    assert_eq!(
        session.set_drink_quantity(ItemId(404), 1),
        Mutation::Rejected(RejectReason::UnknownDrink(ItemId(404)))
    );
    assert!(session.selected_meals().is_empty());
    assert!(session.selected_drinks().is_empty());

    Ok(())
}

#[test]
fn category_restricted_plan_narrows_the_meal_set() -> TestResult {
    let catalog = sample_catalog()?;
    let plan = PlanConfig::with_category(5, CategoryId(2));
    let session = BasketSession::new(catalog, plan);

    let visible: Vec<u64> = session.filtered_meals().map(|meal| meal.id.0).collect();

    assert_eq!(visible, vec![12]);

    Ok(())
}
