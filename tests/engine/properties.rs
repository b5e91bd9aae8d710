//! Property tests for result resolution over the fixture table

use proptest::prelude::*;
use ratescope_engine::{ResolveMode, SUGGESTION_LIMIT, normalize};
use ratescope_foundation::Dimension;

use crate::fixtures::engine;

fn tier() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Free", "Pro"])
}

fn query() -> impl Strategy<Value = String> {
    "[a-zA-Z/ ]{0,6}"
}

proptest! {
    #[test]
    fn search_results_match_the_query_within_the_tier(tier in tier(), text in query()) {
        let mut engine = engine();
        engine.select(Dimension::Tier, Some(tier)).unwrap();
        engine.set_query(&text).unwrap();

        let needle = normalize(&text);
        let resolution = engine.resolution();
        if needle.is_empty() {
            prop_assert_eq!(resolution.mode, ResolveMode::Filter);
        } else {
            prop_assert_eq!(resolution.mode, ResolveMode::Search);
        }
        for stored in resolution.rules.iter() {
            prop_assert_eq!(stored.subscription_type.as_str(), tier);
            if !needle.is_empty() {
                let haystack = format!(
                    "{}\n{}\n{}",
                    stored.path, stored.endpoint_type, stored.api
                )
                .to_lowercase();
                prop_assert!(haystack.contains(&needle));
            }
        }
    }

    #[test]
    fn suggestions_are_bounded_distinct_and_matching(tier in tier(), text in query()) {
        let mut engine = engine();
        engine.select(Dimension::Tier, Some(tier)).unwrap();
        engine.set_query(&text).unwrap();

        let suggestions = engine.suggestions();
        prop_assert!(suggestions.len() <= SUGGESTION_LIMIT);
        let needle = normalize(&text);
        for (i, path) in suggestions.iter().enumerate() {
            prop_assert!(path.to_lowercase().contains(&needle));
            prop_assert!(!suggestions[..i].contains(path));
        }
    }

    #[test]
    fn method_filter_keeps_rules_listing_the_token(tier in tier(), api in 0..2usize, kind in 0..3usize, method in 0..2usize) {
        let mut engine = engine();
        engine.select(Dimension::Tier, Some(tier)).unwrap();
        let Some(api) = engine.options().apis.get(api).cloned() else { return Ok(()); };
        engine.select(Dimension::Api, Some(&api)).unwrap();
        let Some(kind) = engine.options().endpoint_types.get(kind).cloned() else { return Ok(()); };
        engine.select(Dimension::EndpointType, Some(&kind)).unwrap();
        let Some(method) = engine.options().methods.get(method).cloned() else { return Ok(()); };
        engine.select(Dimension::Method, Some(&method)).unwrap();

        prop_assert!(!engine.resolution().is_empty());
        for stored in engine.resolution().rules.iter() {
            prop_assert!(stored.has_method(&method));
            prop_assert_eq!(stored.api.as_str(), api.as_str());
        }
    }

    #[test]
    fn double_click_restores_the_selection(tier in tier(), index in 0..4usize) {
        let mut engine = engine();
        engine.select(Dimension::Tier, Some(tier)).unwrap();
        let ids = engine.resolution().ids();
        let Some(id) = ids.get(index).copied() else { return Ok(()); };

        let before = engine.selected_id();
        engine.click(id).unwrap();
        engine.click(id).unwrap();
        if before == Some(id) {
            prop_assert_eq!(engine.selected_id(), Some(id));
        } else {
            prop_assert_eq!(engine.selected_id(), None);
        }
    }

    #[test]
    fn selecting_a_tier_twice_is_idempotent(tier in tier(), text in "[a-z]{1,4}") {
        let mut once = engine();
        once.select(Dimension::Tier, Some(tier)).unwrap();

        let mut twice = engine();
        twice.select(Dimension::Tier, Some(tier)).unwrap();
        twice.set_query(&text).unwrap();
        twice.select(Dimension::Tier, Some(tier)).unwrap();

        prop_assert_eq!(once.filters(), twice.filters());
        prop_assert_eq!(once.selected_id(), twice.selected_id());
        prop_assert_eq!(once.resolution().ids(), twice.resolution().ids());
    }
}
