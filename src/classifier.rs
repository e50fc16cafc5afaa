use lazy_static::lazy_static;
use regex::Regex;

use crate::models::Role;

lazy_static! {
    static ref WEEK: Regex = Regex::new(r"(?i)week").unwrap();
    static ref ITEM: Regex = Regex::new(r"(?i)(item|product|name|description)").unwrap();
    static ref ITEM_FALLBACK: Regex = Regex::new(r"(?i)(sku|code|id)").unwrap();
    static ref SKU: Regex = Regex::new(r"(?i)(sku|item|product|code|id)").unwrap();
    static ref OPENING: Regex = Regex::new(r"(?i)(opening|start|begin)").unwrap();
    static ref RECEIVED: Regex =
        Regex::new(r"(?i)(received|added|incoming|brought|restock|purchased|bought)").unwrap();
    static ref USED: Regex = Regex::new(r"(?i)(used|sold|outgoing|shipped|consumed|spent)").unwrap();
    static ref CLOSING: Regex =
        Regex::new(r"(?i)(closing|ending|final|remain|available|on\s?hand)").unwrap();
    static ref NUMERIC: Regex = Regex::new(
        r"(?i)(qty|quantity|count|stock|units|cost|price|amount|inventory|opening|closing|sold|received)"
    )
    .unwrap();
    static ref QUANTITY: Regex = Regex::new(r"(?i)(qty|quantity|count|stock|units|closing)").unwrap();
}

fn pattern(role: Role) -> &'static Regex {
    match role {
        Role::Week => &*WEEK,
        Role::Item => &*ITEM,
        Role::Sku => &*SKU,
        Role::Opening => &*OPENING,
        Role::Received => &*RECEIVED,
        Role::Used => &*USED,
        Role::Closing => &*CLOSING,
    }
}

/// Whether a header satisfies a role's pattern on its own. The item role's
/// code fallback is not considered here.
pub fn matches_role(role: Role, column: &str) -> bool {
    pattern(role).is_match(column)
}

fn first_match<'a>(columns: &'a [String], re: &Regex) -> Option<&'a String> {
    columns.iter().find(|c| re.is_match(c))
}

/// Column carrying a role, first match in column order.
pub fn find_role(columns: &[String], role: Role) -> Option<&String> {
    match role {
        Role::Item => first_match(columns, &ITEM).or_else(|| first_match(columns, &ITEM_FALLBACK)),
        _ => first_match(columns, pattern(role)),
    }
}

/// Role to column mapping derived from a column list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleMap {
    pub week: Option<String>,
    pub item: Option<String>,
    pub sku: Option<String>,
    pub opening: Option<String>,
    pub received: Option<String>,
    pub used: Option<String>,
    pub closing: Option<String>,
}

impl RoleMap {
    pub fn get(&self, role: Role) -> Option<&str> {
        let slot = match role {
            Role::Week => &self.week,
            Role::Item => &self.item,
            Role::Sku => &self.sku,
            Role::Opening => &self.opening,
            Role::Received => &self.received,
            Role::Used => &self.used,
            Role::Closing => &self.closing,
        };
        slot.as_deref()
    }

    /// Roles assigned to `column`, in rule order.
    pub fn roles_of(&self, column: &str) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|r| self.get(*r) == Some(column))
            .collect()
    }

    /// Column used to name a row in messages: item, then SKU.
    pub fn descriptor(&self) -> Option<&str> {
        self.item.as_deref().or(self.sku.as_deref())
    }
}

pub fn classify(columns: &[String]) -> RoleMap {
    let find = |role| find_role(columns, role).cloned();
    RoleMap {
        week: find(Role::Week),
        item: find(Role::Item),
        sku: find(Role::Sku),
        opening: find(Role::Opening),
        received: find(Role::Received),
        used: find(Role::Used),
        closing: find(Role::Closing),
    }
}

/// Columns whose values are treated as numbers for display.
pub fn is_numeric_column(column: &str) -> bool {
    NUMERIC.is_match(column)
}

/// Column summed by the statistics view.
pub fn quantity_column(columns: &[String]) -> Option<&String> {
    first_match(columns, &QUANTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_template_headers() {
        let map = classify(&cols(&[
            "Week",
            "SKU",
            "Item Name",
            "Category",
            "Opening Stock",
            "Units Received",
            "Units Sold",
            "Closing Stock",
            "Notes",
        ]));
        assert_eq!(map.week.as_deref(), Some("Week"));
        assert_eq!(map.item.as_deref(), Some("Item Name"));
        assert_eq!(map.sku.as_deref(), Some("SKU"));
        assert_eq!(map.opening.as_deref(), Some("Opening Stock"));
        assert_eq!(map.received.as_deref(), Some("Units Received"));
        assert_eq!(map.used.as_deref(), Some("Units Sold"));
        assert_eq!(map.closing.as_deref(), Some("Closing Stock"));
    }

    #[test]
    fn test_case_insensitive() {
        let map = classify(&cols(&["PRODUCT", "qty SHIPPED", "on hand"]));
        assert_eq!(map.item.as_deref(), Some("PRODUCT"));
        assert_eq!(map.used.as_deref(), Some("qty SHIPPED"));
        assert_eq!(map.closing.as_deref(), Some("on hand"));
    }

    #[test]
    fn test_item_falls_back_to_code() {
        let map = classify(&cols(&["Code", "Count"]));
        assert_eq!(map.item.as_deref(), Some("Code"));
        assert_eq!(map.sku.as_deref(), Some("Code"));
    }

    #[test]
    fn test_first_match_wins() {
        let map = classify(&cols(&["Units Used", "Units Spent"]));
        assert_eq!(map.used.as_deref(), Some("Units Used"));
    }

    #[test]
    fn test_unmatched_roles_are_none() {
        let map = classify(&cols(&["Colour", "Size"]));
        assert_eq!(map, RoleMap::default());
    }

    #[test]
    fn test_deterministic() {
        let columns = cols(&["Week", "Product", "Restock", "Consumed"]);
        assert_eq!(classify(&columns), classify(&columns));
    }

    #[test]
    fn test_roles_of() {
        let map = classify(&cols(&["SKU", "Qty"]));
        assert_eq!(map.roles_of("SKU"), vec![Role::Item, Role::Sku]);
        assert!(map.roles_of("Qty").is_empty());
    }

    #[test]
    fn test_numeric_and_quantity_columns() {
        assert!(is_numeric_column("Unit Cost"));
        assert!(is_numeric_column("Opening Stock"));
        assert!(!is_numeric_column("Notes"));
        let columns = cols(&["Item", "Price", "On Hand Qty"]);
        assert_eq!(quantity_column(&columns).map(String::as_str), Some("On Hand Qty"));
    }
}
