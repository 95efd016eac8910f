use bundle_advisor::{
    display_pair, monthly_cost, recommend_tier, savings_between, units_needed, BundleAdvisor,
    Catalog, Tier, VolumeRange,
};

fn catalog() -> &'static Catalog {
    Catalog::reference()
}

fn tier(id: &str) -> &'static Tier {
    catalog().get(id).unwrap()
}

fn ids<'a>(pair: (&'a Tier, &'a Tier)) -> (&'a str, &'a str) {
    (pair.0.id.as_str(), pair.1.id.as_str())
}

#[test]
fn test_reference_catalog_shape() {
    let tiers: Vec<(&str, u64, u32)> = catalog()
        .tiers()
        .iter()
        .map(|t| (t.id.as_str(), t.monthly_price, t.daily_capacity))
        .collect();
    assert_eq!(
        tiers,
        vec![("mini", 1000, 200), ("trivya", 2500, 400), ("trivyaHigh", 4000, 1000)]
    );
}

#[test]
fn test_recommended_tier_breakpoints() {
    assert_eq!(recommend_tier(150, catalog()).id, "mini");
    assert_eq!(recommend_tier(200, catalog()).id, "mini");
    assert_eq!(recommend_tier(201, catalog()).id, "trivya");
    assert_eq!(recommend_tier(400, catalog()).id, "trivya");
    assert_eq!(recommend_tier(401, catalog()).id, "trivyaHigh");
    assert_eq!(recommend_tier(1000, catalog()).id, "trivyaHigh");
    // beyond every single-unit capacity: stay on the largest tier
    assert_eq!(recommend_tier(5000, catalog()).id, "trivyaHigh");
}

#[test]
fn test_display_pairs() {
    assert_eq!(ids(display_pair(150, catalog())), ("mini", "trivya"));
    assert_eq!(ids(display_pair(450, catalog())), ("trivya", "trivyaHigh"));
    assert_eq!(ids(display_pair(400, catalog())), ("mini", "trivya"));
    assert_eq!(ids(display_pair(401, catalog())), ("trivya", "trivyaHigh"));
}

#[test]
fn test_units_and_costs() {
    assert_eq!(units_needed(150, tier("mini")), 1);
    assert_eq!(units_needed(250, tier("mini")), 2);
    assert_eq!(units_needed(1000, tier("mini")), 5);

    assert_eq!(monthly_cost(250, tier("mini")), 2000);
    assert_eq!(monthly_cost(250, tier("trivya")), 2500);
    assert_eq!(savings_between(250, tier("mini"), tier("trivya")), 500);
}

#[test]
fn test_recommendation_never_shrinks_as_volume_grows() {
    let mut previous = 0;
    for volume in VolumeRange::default().values() {
        let capacity = recommend_tier(volume, catalog()).daily_capacity;
        assert!(capacity >= previous, "volume {} picked a smaller tier", volume);
        previous = capacity;
    }
}

#[test]
fn test_cost_is_exact_integer_product() {
    for volume in 50..=1000u32 {
        for t in catalog().tiers() {
            assert_eq!(monthly_cost(volume, t), units_needed(volume, t) * t.monthly_price);
        }
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let advisor = BundleAdvisor::reference();
    for volume in [50, 200, 210, 400, 650, 1000] {
        let first = advisor.recommend(volume);
        let second = advisor.recommend(volume);
        assert_eq!(first, second);
        assert_eq!(
            monthly_cost(volume, tier("trivya")),
            monthly_cost(volume, tier("trivya"))
        );
    }
}

#[test]
fn test_advisor_is_shareable_across_threads() {
    let advisor = std::sync::Arc::new(BundleAdvisor::reference());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let advisor = advisor.clone();
            std::thread::spawn(move || advisor.recommend(200 + i * 100).recommended)
        })
        .collect();

    let picked: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().to_string())
        .collect();
    assert_eq!(picked, vec!["mini", "trivya", "trivya", "trivyaHigh"]);
}
