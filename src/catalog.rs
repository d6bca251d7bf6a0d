//! Catalog
//!
//! Read-only snapshot of the menu a basket session composes against. Items
//! arrive from an external catalog source; the session never refetches them.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::PlanConfig;

/// Backend-assigned identifier of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend-assigned identifier of a menu category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

/// Classification of a catalog item within the weekly menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A main meal, eligible for weekly plan slots.
    Main,

    /// Any other menu classification (sides, extras, specials).
    Other(u16),
}

impl ItemKind {
    /// Map the backend's numeric type id; `1` denotes a main meal.
    #[must_use]
    pub fn from_type_id(type_id: u16) -> Self {
        if type_id == 1 {
            ItemKind::Main
        } else {
            ItemKind::Other(type_id)
        }
    }

    /// Whether this item can occupy a weekly plan slot.
    #[must_use]
    pub fn is_main(self) -> bool {
        matches!(self, ItemKind::Main)
    }
}

/// A meal or drink as supplied by the catalog source.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// Item identifier.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Display description.
    pub description: String,

    /// Image reference, when the backend supplies one.
    pub image: Option<String>,

    /// Calories per serving.
    pub calories: u32,

    /// Protein per serving, in grams.
    pub protein: u32,

    /// Menu category.
    pub category: CategoryId,

    /// Menu classification.
    pub kind: ItemKind,

    /// Whether selecting this item requires an active membership.
    pub is_membership: bool,

    /// Unit price.
    pub price: Money<'static, Currency>,
}

/// Errors related to catalog construction.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two items on the same side of the catalog share an id.
    #[error("duplicate catalog item id {0}")]
    DuplicateItem(u64),

    /// An item's currency differs from the catalog currency (id, item currency, catalog currency).
    #[error("item {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(u64, &'static str, &'static str),
}

/// Catalog snapshot: meals and drinks keyed by id, in a single currency.
#[derive(Debug, Clone)]
pub struct Catalog {
    meals: FxHashMap<ItemId, CatalogItem>,
    drinks: FxHashMap<ItemId, CatalogItem>,
    currency: &'static Currency,
}

impl Catalog {
    /// Create a catalog from meal and drink snapshots.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an id repeats within a side or an item
    /// is priced in a different currency than the catalog.
    pub fn new(
        meals: impl IntoIterator<Item = CatalogItem>,
        drinks: impl IntoIterator<Item = CatalogItem>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        Ok(Catalog {
            meals: keyed(meals, currency)?,
            drinks: keyed(drinks, currency)?,
            currency,
        })
    }

    /// Look up a meal by id.
    #[must_use]
    pub fn meal(&self, id: ItemId) -> Option<&CatalogItem> {
        self.meals.get(&id)
    }

    /// Look up a drink by id.
    #[must_use]
    pub fn drink(&self, id: ItemId) -> Option<&CatalogItem> {
        self.drinks.get(&id)
    }

    /// Iterate over all meals, in no particular order.
    pub fn meals(&self) -> impl Iterator<Item = &CatalogItem> {
        self.meals.values()
    }

    /// Iterate over all drinks, in no particular order.
    pub fn drinks(&self) -> impl Iterator<Item = &CatalogItem> {
        self.drinks.values()
    }

    /// Iterate over the meals visible under a plan: main meals only,
    /// restricted to the plan's category when one is set.
    pub fn filtered_meals<'a>(
        &'a self,
        plan: &'a PlanConfig,
    ) -> impl Iterator<Item = &'a CatalogItem> {
        self.meals.values().filter(move |meal| {
            meal.kind.is_main() && plan.category.is_none_or(|category| meal.category == category)
        })
    }

    /// Get the currency of the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Key items by id, rejecting duplicates and foreign currencies.
fn keyed(
    items: impl IntoIterator<Item = CatalogItem>,
    currency: &'static Currency,
) -> Result<FxHashMap<ItemId, CatalogItem>, CatalogError> {
    let mut map = FxHashMap::default();

    for item in items {
        let item_currency = item.price.currency();

        if item_currency != currency {
            return Err(CatalogError::CurrencyMismatch(
                item.id.0,
                item_currency.iso_alpha_code,
                currency.iso_alpha_code,
            ));
        }

        let id = item.id;
        if map.insert(id, item).is_some() {
            return Err(CatalogError::DuplicateItem(id.0));
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{GBP, USD},
    };
    use testresult::TestResult;

    use super::*;

    fn meal(id: u64, category: u64, kind: ItemKind) -> CatalogItem {
        CatalogItem {
            id: ItemId(id),
            name: format!("meal-{id}"),
            description: String::new(),
            image: None,
            calories: 500,
            protein: 30,
            category: CategoryId(category),
            kind,
            is_membership: false,
            price: Money::from_minor(1099, GBP),
        }
    }

    #[test]
    fn from_type_id_one_is_main() {
        assert_eq!(ItemKind::from_type_id(1), ItemKind::Main);
        assert_eq!(ItemKind::from_type_id(2), ItemKind::Other(2));
        assert!(ItemKind::from_type_id(1).is_main());
        assert!(!ItemKind::from_type_id(4).is_main());
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = Catalog::new(
            [meal(1, 1, ItemKind::Main), meal(1, 2, ItemKind::Main)],
            [],
            GBP,
        );

        assert!(matches!(result, Err(CatalogError::DuplicateItem(_))));
    }

    #[test]
    fn new_rejects_currency_mismatch() {
        let mut foreign = meal(2, 1, ItemKind::Main);
        foreign.price = Money::from_minor(1099, USD);

        let result = Catalog::new([meal(1, 1, ItemKind::Main), foreign], [], GBP);

        match result {
            Err(CatalogError::CurrencyMismatch(id, item_currency, catalog_currency)) => {
                assert_eq!(id, 2);
                assert_eq!(item_currency, USD.iso_alpha_code);
                assert_eq!(catalog_currency, GBP.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }
    }

    #[test]
    fn lookups_are_side_scoped() -> TestResult {
        let catalog = Catalog::new([meal(1, 1, ItemKind::Main)], [meal(9, 3, ItemKind::Other(2))], GBP)?;

        assert!(catalog.meal(ItemId(1)).is_some());
        assert!(catalog.drink(ItemId(1)).is_none());
        assert!(catalog.drink(ItemId(9)).is_some());
        assert!(catalog.meal(ItemId(9)).is_none());

        Ok(())
    }

    #[test]
    fn filtered_meals_honors_kind_and_category() -> TestResult {
        let catalog = Catalog::new(
            [
                meal(1, 1, ItemKind::Main),
                meal(2, 2, ItemKind::Main),
                meal(3, 1, ItemKind::Other(2)),
            ],
            [],
            GBP,
        )?;

        let unrestricted = PlanConfig::new(5);
        let mut visible: Vec<u64> = catalog
            .filtered_meals(&unrestricted)
            .map(|m| m.id.0)
            .collect();
        visible.sort_unstable();
        assert_eq!(visible, vec![1, 2]);

        let restricted = PlanConfig::with_category(5, CategoryId(1));
        let visible: Vec<u64> = catalog
            .filtered_meals(&restricted)
            .map(|m| m.id.0)
            .collect();
        assert_eq!(visible, vec![1]);

        Ok(())
    }
}
