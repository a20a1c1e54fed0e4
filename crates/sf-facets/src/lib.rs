//! Facet and refinement reconciliation for search result pages.
//!
//! A search response only carries counts for the current query, so a facet
//! the shopper is filtering on would otherwise lose every unselected value
//! after the first click. [`merge_facets`] keeps the previous value list for
//! facets with an active selection and refreshes its counts from the new
//! response. Category trees get the same treatment in [`category`].

pub mod category;

pub use category::{find_category_path, merge_category_tree};

use serde::{Deserialize, Serialize};
use sf_api_types::{Facet, FacetValue, Refinement};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Values the shopper has selected, per facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementState {
    selected: BTreeMap<String, BTreeSet<String>>,
}

impl RefinementState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_selected(selected: &BTreeMap<String, Vec<String>>) -> Self {
        let mut state = Self::new();
        for (facet, values) in selected {
            for value in values {
                state.select(facet, value);
            }
        }
        state
    }

    pub fn select(&mut self, facet: &str, value: &str) {
        self.selected
            .entry(facet.to_owned())
            .or_default()
            .insert(value.to_owned());
    }

    pub fn deselect(&mut self, facet: &str, value: &str) {
        if let Some(values) = self.selected.get_mut(facet) {
            values.remove(value);
            if values.is_empty() {
                self.selected.remove(facet);
            }
        }
    }

    /// Flip one value; returns whether it is selected afterwards.
    pub fn toggle(&mut self, facet: &str, value: &str) -> bool {
        if self.is_selected(facet, value) {
            self.deselect(facet, value);
            false
        } else {
            self.select(facet, value);
            true
        }
    }

    pub fn clear_facet(&mut self, facet: &str) {
        self.selected.remove(facet);
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, facet: &str, value: &str) -> bool {
        self.selected
            .get(facet)
            .is_some_and(|values| values.contains(value))
    }

    pub fn has_selection(&self, facet: &str) -> bool {
        self.selected.contains_key(facet)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn to_refinements(&self) -> Vec<Refinement> {
        self.selected
            .iter()
            .map(|(name, values)| Refinement {
                name: name.clone(),
                values: values.iter().cloned().collect(),
            })
            .collect()
    }
}

/// Set `checked` on every value according to `state`.
pub fn apply_selection(mut facets: Vec<Facet>, state: &RefinementState) -> Vec<Facet> {
    for facet in &mut facets {
        for value in &mut facet.values {
            value.checked = state.is_selected(&facet.name, &value.name);
        }
    }
    facets
}

/// Reconcile the previously rendered facets with a fresh search response.
///
/// Facets follow the fresh response's order. A facet with an active selection
/// keeps its previous values (counts refreshed, 0 when the value vanished)
/// plus any value new in the response. Selected facets missing from the
/// response entirely are appended with zero counts so they stay clearable.
pub fn merge_facets(previous: &[Facet], fresh: &[Facet], state: &RefinementState) -> Vec<Facet> {
    let mut merged = Vec::with_capacity(fresh.len());

    for facet in fresh {
        let kept = state
            .has_selection(&facet.name)
            .then(|| previous.iter().find(|prev| prev.name == facet.name))
            .flatten();

        merged.push(match kept {
            Some(prev) => refresh_counts(prev, facet),
            None => facet.clone(),
        });
    }

    for prev in previous {
        if state.has_selection(&prev.name) && !fresh.iter().any(|facet| facet.name == prev.name) {
            debug!(facet = %prev.name, "selected facet missing from response; keeping with zero counts");
            merged.push(zero_counts(prev));
        }
    }

    apply_selection(merged, state)
}

fn refresh_counts(previous: &Facet, fresh: &Facet) -> Facet {
    let counts: BTreeMap<&str, &FacetValue> = fresh
        .values
        .iter()
        .map(|value| (value.name.as_str(), value))
        .collect();

    let mut values: Vec<FacetValue> = previous
        .values
        .iter()
        .map(|value| FacetValue {
            product_count: counts.get(value.name.as_str()).map_or(0, |v| v.product_count),
            ..value.clone()
        })
        .collect();

    for value in &fresh.values {
        if !previous.values.iter().any(|prev| prev.name == value.name) {
            values.push(value.clone());
        }
    }

    Facet {
        name: fresh.name.clone(),
        display_name: if fresh.display_name.is_empty() {
            previous.display_name.clone()
        } else {
            fresh.display_name.clone()
        },
        facet_type: fresh.facet_type,
        values,
    }
}

fn zero_counts(facet: &Facet) -> Facet {
    let mut facet = facet.clone();
    for value in &mut facet.values {
        value.product_count = 0;
    }
    facet
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_api_types::FacetType;

    fn value(name: &str, count: u64) -> FacetValue {
        FacetValue {
            name: name.to_owned(),
            display_name: name.to_uppercase(),
            product_count: count,
            checked: false,
        }
    }

    fn facet(name: &str, values: Vec<FacetValue>) -> Facet {
        Facet {
            name: name.to_owned(),
            display_name: name.to_owned(),
            facet_type: FacetType::DistinctValue,
            values,
        }
    }

    fn counts(facet: &Facet) -> Vec<(&str, u64, bool)> {
        facet
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.product_count, v.checked))
            .collect()
    }

    #[test]
    fn toggle_selects_then_clears() {
        let mut state = RefinementState::new();
        assert!(state.toggle("color", "red"));
        assert!(state.is_selected("color", "red"));
        assert!(!state.toggle("color", "red"));
        assert!(!state.has_selection("color"));
        assert!(state.is_empty());
    }

    #[test]
    fn refinements_are_sorted_by_facet_and_value() {
        let mut state = RefinementState::new();
        state.select("size", "m");
        state.select("color", "red");
        state.select("color", "blue");

        assert_eq!(
            state.to_refinements(),
            vec![
                Refinement {
                    name: "color".to_owned(),
                    values: vec!["blue".to_owned(), "red".to_owned()],
                },
                Refinement {
                    name: "size".to_owned(),
                    values: vec!["m".to_owned()],
                },
            ]
        );

        state.clear_facet("color");
        assert_eq!(state.to_refinements().len(), 1);
        state.clear_all();
        assert!(state.is_empty());
    }

    #[test]
    fn selected_facet_keeps_previous_values_with_fresh_counts() {
        let previous = vec![facet("color", vec![value("red", 4), value("blue", 6), value("green", 1)])];
        let fresh = vec![facet("color", vec![value("red", 4), value("black", 2)])];
        let mut state = RefinementState::new();
        state.select("color", "red");

        let merged = merge_facets(&previous, &fresh, &state);

        assert_eq!(merged.len(), 1);
        assert_eq!(
            counts(&merged[0]),
            vec![
                ("red", 4, true),
                ("blue", 0, false),
                ("green", 0, false),
                ("black", 2, false),
            ]
        );
    }

    #[test]
    fn unselected_facet_takes_fresh_values() {
        let previous = vec![facet("size", vec![value("s", 3), value("m", 5)])];
        let fresh = vec![facet("size", vec![value("m", 2)])];

        let merged = merge_facets(&previous, &fresh, &RefinementState::new());

        assert_eq!(counts(&merged[0]), vec![("m", 2, false)]);
    }

    #[test]
    fn selected_facet_missing_from_response_is_kept() {
        let previous = vec![
            facet("brand", vec![value("acme", 3)]),
            facet("color", vec![value("red", 1)]),
        ];
        let fresh = vec![facet("color", vec![value("red", 1)])];
        let mut state = RefinementState::new();
        state.select("brand", "acme");

        let merged = merge_facets(&previous, &fresh, &state);

        let names: Vec<&str> = merged.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["color", "brand"]);
        assert_eq!(counts(&merged[1]), vec![("acme", 0, true)]);
    }

    #[test]
    fn state_round_trips_from_request_map() {
        let mut selected = BTreeMap::new();
        selected.insert("color".to_owned(), vec!["red".to_owned(), "red".to_owned()]);
        let state = RefinementState::from_selected(&selected);
        assert_eq!(state.to_refinements()[0].values, vec!["red".to_owned()]);

        let json = serde_json::to_string(&state).unwrap();
        let back: RefinementState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
