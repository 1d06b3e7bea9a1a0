//! Integration test for the storefront fixture set.
//!
//! Loads the full catalog + offers set and walks the back-office flows end
//! to end: classifying every offer at a handful of instants, evaluating the
//! bundle economics, resolving tier prices, and rendering the offer board.

use jiff::Timestamp;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use souk::{
    bundles::{evaluate_bundle, validate_bundle},
    fixtures::Fixture,
    offers::Offer,
    report::OfferBoard,
    tiers::resolve_tier,
    windows::OfferStatus,
};

fn mid_august() -> TestResult<Timestamp> {
    Ok("2026-08-15T12:00:00Z".parse()?)
}

#[test]
fn storefront_offers_classify_against_one_instant() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let now = mid_august()?;

    assert_eq!(
        fixture.offer("starter-kit")?.status_at(now)?,
        OfferStatus::Current
    );
    assert_eq!(
        fixture.offer("grinder-flash")?.status_at(now)?,
        OfferStatus::Current
    );
    assert_eq!(
        fixture.offer("bean-binge")?.status_at(now)?,
        OfferStatus::Upcoming
    );
    assert_eq!(
        fixture.offer("kettle-clearance")?.status_at(now)?,
        OfferStatus::Expired
    );

    Ok(())
}

#[test]
fn disabled_offers_never_report_active() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;

    // Inside the clearance window, but the offer is switched off.
    let june: Timestamp = "2026-06-15T12:00:00Z".parse()?;
    let clearance = fixture.offer("kettle-clearance")?;

    assert_eq!(clearance.status_at(june)?, OfferStatus::Current);
    assert!(!clearance.is_active_at(june)?);

    Ok(())
}

#[test]
fn starter_kit_bundle_is_valid_and_prices_out() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;

    let Offer::Bundle(kit) = fixture.offer("starter-kit")? else {
        unreachable!("starter-kit is a bundle in the fixture")
    };

    let violations = validate_bundle(kit.quote())?;

    assert!(violations.is_empty(), "the fixture bundle should be valid");

    // £34.00 + £62.00 + £28.00 against a £99.00 asking price.
    let evaluation = evaluate_bundle(kit.quote())?;

    assert_eq!(evaluation.original_total, Money::from_minor(12_400, GBP));
    assert_eq!(evaluation.savings, Money::from_minor(2_500, GBP));
    assert_eq!(evaluation.savings_percent_points().to_string(), "20.2");

    Ok(())
}

#[test]
fn bean_tiers_resolve_by_quantity_with_list_price_fallback() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let beans = fixture.product("espresso-beans")?;

    assert_eq!(
        resolve_tier(&beans.tiers, 5)?.map(|tier| tier.unit_price().to_minor_units()),
        Some(500)
    );
    assert_eq!(
        resolve_tier(&beans.tiers, 25)?.map(|tier| tier.unit_price().to_minor_units()),
        Some(450)
    );
    assert_eq!(
        resolve_tier(&beans.tiers, 500)?.map(|tier| tier.unit_price().to_minor_units()),
        Some(400)
    );

    // Products without tier pricing fall back to the list price.
    let pot = fixture.product("moka-pot")?;

    assert_eq!(resolve_tier(&pot.tiers, 25)?, None);
    assert_eq!(pot.price, Money::from_minor(3_400, GBP));

    Ok(())
}

#[test]
fn offer_board_renders_the_whole_set() -> TestResult {
    let fixture = Fixture::from_set("storefront")?;
    let board = OfferBoard::at(mid_august()?);

    let mut out = Vec::new();

    board.write_to(&mut out, fixture.offers(), fixture.offer_meta_map())?;

    let rendered = String::from_utf8(out)?;

    for name in [
        "Home Barista Starter Kit",
        "Grinder Flash Sale",
        "Bean Binge",
        "Kettle Clearance",
    ] {
        assert!(rendered.contains(name), "board should list {name}");
    }

    assert!(
        rendered.contains("(live: 2, upcoming: 1, expired: 1)"),
        "summary should count the set, got:\n{rendered}"
    );

    // £25.00 from the starter kit plus £29.80 from the grinder flash sale.
    assert!(
        rendered.contains("Live savings: £54.80"),
        "live savings should sum both running offers, got:\n{rendered}"
    );

    Ok(())
}
