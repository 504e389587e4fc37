//! Product reshaping.

use std::sync::LazyLock;

use regex::Regex;

use crate::shopify::storefront::fragments::{Connection, ShopifyProduct};
use crate::shopify::types::{Image, Product};

use super::remove_edges_and_nodes;

/// Captures the last path segment of a URL without its extension.
static FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*/(.*)\..*").expect("Invalid regex"));

/// File name of an image URL, without directory or extension.
fn image_filename(url: &str) -> Option<&str> {
    FILENAME_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Flatten images, filling missing alt text with `"<title> - <filename>"`.
pub fn reshape_images(images: Connection<Image>, product_title: &str) -> Vec<Image> {
    remove_edges_and_nodes(images)
        .into_iter()
        .map(|image| {
            if image.alt_text.as_deref().is_some_and(|alt| !alt.is_empty()) {
                return image;
            }

            let alt_text = image_filename(&image.url).map_or_else(
                || product_title.to_string(),
                |filename| format!("{product_title} - {filename}"),
            );

            Image {
                alt_text: Some(alt_text),
                ..image
            }
        })
        .collect()
}

/// Reshape a product.
///
/// With `hidden_tag` set, a product carrying that tag yields `None`.
pub fn reshape_product(product: ShopifyProduct, hidden_tag: Option<&str>) -> Option<Product> {
    if let Some(tag) = hidden_tag
        && product.tags.iter().any(|t| t == tag)
    {
        return None;
    }

    let images = reshape_images(product.images, &product.title);

    Some(Product {
        id: product.id,
        handle: product.handle,
        available_for_sale: product.available_for_sale,
        title: product.title,
        description: product.description,
        description_html: product.description_html,
        options: product.options,
        price_range: product.price_range,
        featured_image: product.featured_image,
        seo: product.seo,
        tags: product.tags,
        images,
        variants: remove_edges_and_nodes(product.variants),
        updated_at: product.updated_at,
    })
}

/// Reshape a product list, dropping products tagged `hidden_tag`.
pub fn reshape_products(products: Vec<ShopifyProduct>, hidden_tag: &str) -> Vec<Product> {
    products
        .into_iter()
        .filter_map(|product| reshape_product(product, Some(hidden_tag)))
        .collect()
}

/// Keep products whose title, description or a tag contains `query`.
///
/// Matching is case-insensitive on the trimmed query; a blank or absent
/// query keeps everything.
pub fn filter_products(products: Vec<Product>, query: Option<&str>) -> Vec<Product> {
    let Some(term) = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty())
    else {
        return products;
    };

    products
        .into_iter()
        .filter(|product| {
            product.title.to_lowercase().contains(&term)
                || product.description.to_lowercase().contains(&term)
                || product
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&term))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::shopify::storefront::fragments::Edge;

    const HIDDEN: &str = "nextjs-frontend-hidden";

    fn image(url: &str, alt: Option<&str>) -> Image {
        Image {
            url: url.to_string(),
            alt_text: alt.map(String::from),
            width: Some(800),
            height: Some(800),
        }
    }

    fn shopify_product(handle: &str, title: &str, tags: &[&str]) -> ShopifyProduct {
        serde_json::from_value(json!({
            "id": format!("gid://shopify/Product/{handle}"),
            "handle": handle,
            "availableForSale": true,
            "title": title,
            "description": format!("{title} description"),
            "descriptionHtml": format!("<p>{title} description</p>"),
            "options": [{ "id": "gid://shopify/ProductOption/1", "name": "Size", "values": ["S", "M"] }],
            "priceRange": {
                "maxVariantPrice": { "amount": "12.50", "currencyCode": "EUR" },
                "minVariantPrice": { "amount": "9.90", "currencyCode": "EUR" }
            },
            "variants": { "edges": [
                { "node": {
                    "id": "gid://shopify/ProductVariant/1",
                    "title": "S",
                    "availableForSale": true,
                    "selectedOptions": [{ "name": "Size", "value": "S" }],
                    "price": { "amount": "9.90", "currencyCode": "EUR" }
                } },
                { "node": {
                    "id": "gid://shopify/ProductVariant/2",
                    "title": "M",
                    "availableForSale": false,
                    "selectedOptions": [{ "name": "Size", "value": "M" }],
                    "price": { "amount": "12.50", "currencyCode": "EUR" }
                } }
            ] },
            "featuredImage": null,
            "images": { "edges": [
                { "node": { "url": "https://cdn.shopify.com/s/files/1/bolsa-kraft.jpg?v=17", "altText": null, "width": 800, "height": 800 } },
                { "node": { "url": "https://cdn.shopify.com/s/files/1/detalle.png", "altText": "Detalle del asa", "width": 400, "height": 300 } }
            ] },
            "seo": { "title": null, "description": null },
            "tags": tags,
            "updatedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_image_filename() {
        assert_eq!(
            image_filename("https://cdn.shopify.com/s/files/1/bolsa-kraft.jpg?v=17"),
            Some("bolsa-kraft")
        );
        assert_eq!(
            image_filename("https://cdn.shopify.com/files/rollo.film.webp"),
            Some("rollo.film")
        );
        assert_eq!(image_filename("no-slashes-or-dots"), None);
    }

    #[test]
    fn test_reshape_images_fills_missing_alt_text() {
        let images = Connection {
            edges: vec![
                Edge {
                    node: image("https://cdn.shopify.com/files/bolsa-kraft.jpg", None),
                },
                Edge {
                    node: image("https://cdn.shopify.com/files/asa.jpg", Some("")),
                },
                Edge {
                    node: image("https://cdn.shopify.com/files/caja.jpg", Some("Caja")),
                },
            ],
        };

        let reshaped = reshape_images(images, "Bolsa Kraft");
        let alts: Vec<_> = reshaped
            .iter()
            .map(|i| i.alt_text.as_deref().unwrap())
            .collect();
        assert_eq!(alts, ["Bolsa Kraft - bolsa-kraft", "Bolsa Kraft - asa", "Caja"]);
    }

    #[test]
    fn test_reshape_images_without_filename_uses_title() {
        let images = Connection {
            edges: vec![Edge {
                node: image("data-uri", None),
            }],
        };
        let reshaped = reshape_images(images, "Bolsa Kraft");
        assert_eq!(reshaped[0].alt_text.as_deref(), Some("Bolsa Kraft"));
    }

    #[test]
    fn test_reshape_product_flattens_connections() {
        let product = reshape_product(shopify_product("bolsa-kraft", "Bolsa Kraft", &[]), Some(HIDDEN))
            .unwrap();

        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[1].id.as_str(), "gid://shopify/ProductVariant/2");
        assert_eq!(product.images.len(), 2);
        assert_eq!(
            product.images[0].alt_text.as_deref(),
            Some("Bolsa Kraft - bolsa-kraft")
        );
        assert_eq!(product.images[1].alt_text.as_deref(), Some("Detalle del asa"));
        assert_eq!(product.price_range.min_variant_price.amount.to_string(), "9.90");
    }

    #[test]
    fn test_reshape_product_hidden_tag() {
        let hidden = shopify_product("muestra", "Muestra", &["promo", HIDDEN]);
        assert!(reshape_product(hidden.clone(), Some(HIDDEN)).is_none());
        assert!(reshape_product(hidden, None).is_some());
    }

    #[test]
    fn test_reshape_products_drops_hidden_and_keeps_order() {
        let products = vec![
            shopify_product("c", "C", &[]),
            shopify_product("hidden", "Hidden", &[HIDDEN]),
            shopify_product("a", "A", &["sale"]),
        ];
        let handles: Vec<_> = reshape_products(products, HIDDEN)
            .into_iter()
            .map(|p| p.handle)
            .collect();
        assert_eq!(handles, ["c", "a"]);
    }

    #[test]
    fn test_filter_products_matches_title_description_and_tags() {
        let products = reshape_products(
            vec![
                shopify_product("rollo-film", "Rollo Film Estirable", &[]),
                shopify_product("bolsa-kraft", "Bolsa Kraft", &["ROLLO-compatible"]),
                shopify_product("caja", "Caja", &[]),
            ],
            HIDDEN,
        );

        let handles: Vec<_> = filter_products(products.clone(), Some("  Rollo "))
            .into_iter()
            .map(|p| p.handle)
            .collect();
        assert_eq!(handles, ["rollo-film", "bolsa-kraft"]);

        let by_description: Vec<_> = filter_products(products, Some("caja desc"))
            .into_iter()
            .map(|p| p.handle)
            .collect();
        assert_eq!(by_description, ["caja"]);
    }

    #[test]
    fn test_filter_products_blank_query_keeps_all() {
        let products = reshape_products(
            vec![shopify_product("a", "A", &[]), shopify_product("b", "B", &[])],
            HIDDEN,
        );
        assert_eq!(filter_products(products.clone(), None).len(), 2);
        assert_eq!(filter_products(products, Some("   ")).len(), 2);
    }
}
