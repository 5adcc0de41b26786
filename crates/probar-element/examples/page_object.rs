//! Example: Page Objects over Self-Healing Elements
//!
//! Demonstrates: pages, nested components, staleness recovery, waits and the
//! click retry, against the in-memory mock driver.
//!
//! Run with: `cargo run --example page_object`

use probar_element::mock::{MockDriver, MockElement};
use probar_element::prelude::*;
use std::sync::Arc;

fn main() -> ElementResult<()> {
    println!("=== Page Object Example ===\n");

    // 1. Build a small document
    println!("1. Building a mock checkout page...");
    let driver = Arc::new(MockDriver::new());
    let form = driver.add(MockElement::new("form").matching(Locator::css("form#checkout")));
    let email = driver.add(
        MockElement::new("input")
            .matching(Locator::name("email"))
            .under(form),
    );
    let country = driver.add(
        MockElement::new("select")
            .matching(Locator::name("country"))
            .under(form),
    );
    for (value, text) in [("de", "Germany"), ("jp", "Japan")] {
        driver.add(
            MockElement::new("option")
                .with_text(text)
                .with_attribute("value", value)
                .matching(Locator::tag_name("option"))
                .under(country),
        );
    }
    let pay = driver.add(
        MockElement::new("button")
            .with_text("Pay")
            .matching(Locator::xpath("//button[contains(., 'Pay')]"))
            .under(form),
    );
    println!("   Nodes: form, email, country (2 options), pay");

    // 2. Page and component
    println!("\n2. Creating page and checkout component...");
    let config = ElementConfig::from_yaml("timeout_ms: 500\npoll_interval_ms: 20\nclick_backoff_ms: 50\n")
        .unwrap_or_default();
    let page = Page::with_config(Arc::clone(&driver), config);
    let checkout = page.component("form#checkout");
    println!("   {checkout} (depth {})", checkout.depth());

    // 3. Fill in the form
    println!("\n3. Filling in the form...");
    checkout
        .element(&Locator::name("email"), true)?
        .set_value("ada@example.com", true)?;
    println!(
        "   email value: {:?}",
        driver.attribute_of(email, "value").unwrap_or_default()
    );
    let select_el = checkout.element(&Locator::name("country"), true)?;
    SelectElement::new(&select_el).select_by_visible_text("Japan")?;
    println!(
        "   country: {}",
        SelectElement::new(&select_el)
            .selected_text()?
            .unwrap_or_default()
    );

    // 4. Staleness recovery
    println!("\n4. Re-rendering the pay button...");
    // The CSS-looking value is resolved to XPath.
    let pay_button = checkout.element(&Locator::css("//button[contains(., 'Pay')]"), true)?;
    driver.rerender(pay);
    driver.reset_counts();
    println!("   text after re-render: {}", pay_button.text()?);
    println!("   re-locations: {}", driver.counts().locate_one);

    // 5. Occluded click
    println!("\n5. Clicking through a cookie banner...");
    driver.push_click_fault(DriverError::click_intercepted(
        "Other element would receive the click: <div class=\"cookie-banner\">",
    ));
    let report = pay_button.click()?;
    println!(
        "   attempts: {}, scrolls: {}, elapsed: {:?}",
        report.attempts, report.scrolls, report.elapsed
    );

    // 6. Waiting for a spinner to go away
    println!("\n6. Waiting for a missing spinner...");
    let waited = page.wait_until_not_visible(&Locator::css(".spinner"))?;
    println!("   {} in {:?}", waited.waited_for, waited.elapsed);

    println!("\n=== Example Complete ===");
    Ok(())
}
