//! Menu reshaping.

use crate::shopify::storefront::fragments::ShopifyMenuItem;
use crate::shopify::types::Menu;

/// Turn an absolute Shopify URL into a site path by removing the store
/// domain and the `pages/` segment.
pub fn menu_path(url: &str, domain: &str) -> String {
    url.replacen(domain, "", 1).replacen("pages/", "", 1)
}

/// Reshape menu items, keeping one level of submenu entries.
pub fn reshape_menu(items: Vec<ShopifyMenuItem>, domain: &str) -> Vec<Menu> {
    items
        .into_iter()
        .map(|item| Menu {
            path: menu_path(&item.url, domain),
            title: item.title,
            items: item
                .items
                .into_iter()
                .map(|sub| Menu {
                    path: menu_path(&sub.url, domain),
                    title: sub.title,
                    items: Vec::new(),
                })
                .collect(),
        })
        .collect()
}
