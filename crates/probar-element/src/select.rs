//! `<select>` dropdown helper.

use crate::click::ClickOptions;
use crate::driver::{DriverErrorKind, ElementDriver};
use crate::element::Element;
use crate::locator::Locator;
use crate::result::{ElementError, ElementResult};
use tracing::debug;

/// Dropdown view over a `<select>` element
#[derive(Debug)]
pub struct SelectElement<'e, D: ElementDriver> {
    element: &'e Element<D>,
}

impl<'e, D: ElementDriver> SelectElement<'e, D> {
    /// Wrap a `<select>` element
    #[must_use]
    pub const fn new(element: &'e Element<D>) -> Self {
        Self { element }
    }

    /// Underlying element
    #[must_use]
    pub const fn element(&self) -> &'e Element<D> {
        self.element
    }

    /// Every `<option>` in document order
    pub fn options(&self) -> ElementResult<Vec<Element<D>>> {
        self.element.find_descendants(&Locator::tag_name("option"))
    }

    /// Select the option whose text is `text`
    pub fn select_by_visible_text(&self, text: &str) -> ElementResult<()> {
        let found = self.find_option(|option| Ok(option.text()? == text))?;
        self.choose(found, || {
            format!("Could not locate element with visible text: {text}")
        })
    }

    /// Select the option at `index`
    pub fn select_by_index(&self, index: usize) -> ElementResult<()> {
        let found = self.options()?.into_iter().nth(index);
        self.choose(found, || format!("Could not locate element with index {index}"))
    }

    /// Select the option whose `value` attribute is `value`
    pub fn select_by_value(&self, value: &str) -> ElementResult<()> {
        let found =
            self.find_option(|option| Ok(option.get_attribute("value")?.as_deref() == Some(value)))?;
        self.choose(found, || format!("Cannot locate option with value: {value}"))
    }

    /// Text of the first selected option, if any
    pub fn selected_text(&self) -> ElementResult<Option<String>> {
        for option in self.options()? {
            if option.is_selected()? {
                return option.text().map(Some);
            }
        }
        Ok(None)
    }

    fn find_option(
        &self,
        mut matches: impl FnMut(&Element<D>) -> ElementResult<bool>,
    ) -> ElementResult<Option<Element<D>>> {
        for option in self.options()? {
            if matches(&option)? {
                return Ok(Some(option));
            }
        }
        Ok(None)
    }

    fn choose(
        &self,
        option: Option<Element<D>>,
        missing: impl FnOnce() -> String,
    ) -> ElementResult<()> {
        let Some(option) = option else {
            return Err(ElementError::driver_fault(
                &DriverErrorKind::NoSuchElement,
                missing(),
            ));
        };
        if option.is_selected()? {
            return Ok(());
        }
        debug!(select = %self.element.locator(), "selecting option");
        option.click_with(&ClickOptions::from(option.config()).with_wait(false))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ElementConfig;
    use crate::mock::{MockDriver, MockElement};
    use crate::scope::Scope;
    use std::sync::Arc;

    fn dropdown() -> (Arc<MockDriver>, Vec<usize>, Element<MockDriver>) {
        let driver = Arc::new(MockDriver::new());
        let locator = Locator::id("country");
        let select = driver.add(MockElement::new("select").matching(locator.clone()));
        let options = [("de", "Germany"), ("fr", "France"), ("jp", "Japan")]
            .into_iter()
            .map(|(value, text)| {
                let option = MockElement::new("option")
                    .with_text(text)
                    .with_attribute("value", value)
                    .matching(Locator::tag_name("option"))
                    .under(select);
                let option = if value == "de" { option.selected() } else { option };
                driver.add(option)
            })
            .collect();
        let element = Element::new(
            Arc::clone(&driver),
            &locator,
            Scope::Root,
            driver.reference(select).unwrap(),
            ElementConfig::new(),
        );
        (driver, options, element)
    }

    #[test]
    fn test_options_in_order() {
        let (_, _, element) = dropdown();
        let select = SelectElement::new(&element);
        let texts: Vec<String> = select
            .options()
            .unwrap()
            .iter()
            .map(|o| o.text().unwrap())
            .collect();
        assert_eq!(texts, vec!["Germany", "France", "Japan"]);
    }

    #[test]
    fn test_select_by_visible_text() {
        let (driver, options, element) = dropdown();
        let select = SelectElement::new(&element);
        select.select_by_visible_text("Japan").unwrap();
        assert!(driver.is_node_selected(options[2]));
        assert!(!driver.is_node_selected(options[0]));
        assert_eq!(select.selected_text().unwrap().as_deref(), Some("Japan"));
    }

    #[test]
    fn test_select_by_index_and_value() {
        let (driver, options, element) = dropdown();
        let select = SelectElement::new(&element);
        select.select_by_index(1).unwrap();
        assert!(driver.is_node_selected(options[1]));
        select.select_by_value("de").unwrap();
        assert_eq!(select.selected_text().unwrap().as_deref(), Some("Germany"));
    }

    #[test]
    fn test_already_selected_is_not_clicked() {
        let (driver, _, element) = dropdown();
        SelectElement::new(&element)
            .select_by_value("de")
            .unwrap();
        assert_eq!(driver.counts().click, 0);
    }

    #[test]
    fn test_missing_option_is_no_such_element() {
        let (_, _, element) = dropdown();
        let select = SelectElement::new(&element);
        for err in [
            select.select_by_visible_text("Mars").unwrap_err(),
            select.select_by_index(7).unwrap_err(),
            select.select_by_value("xx").unwrap_err(),
        ] {
            assert!(
                matches!(err, ElementError::DriverFault { ref kind, .. } if kind == "no such element")
            );
        }
    }

    #[test]
    fn test_selected_text_none() {
        let driver = Arc::new(MockDriver::new());
        let node = driver.add(MockElement::new("select").matching(Locator::css("select")));
        let element = Element::new(
            Arc::clone(&driver),
            &Locator::css("select"),
            Scope::Root,
            driver.reference(node).unwrap(),
            ElementConfig::new(),
        );
        assert_eq!(SelectElement::new(&element).selected_text().unwrap(), None);
    }
}
