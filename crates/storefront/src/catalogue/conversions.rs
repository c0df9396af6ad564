//! Wire record to view model conversions.

use std::collections::BTreeSet;

use atelier_core::{
    Category, CategoryId, CategoryPage, CurrencyCode, Price, Product, ProductId, Seller, SellerId,
};

use super::CatalogueError;
use super::wire::{CategoryRecord, CategoryResponse, ProductRecord, SellerRecord};

/// Convert a category response into a page, extracting facets on the way.
///
/// A single unusable product record fails the whole page.
pub fn convert_category_page(
    response: CategoryResponse,
    page: u32,
    page_size: u32,
) -> Result<CategoryPage, CatalogueError> {
    let category = convert_category(response.category);
    let products = response
        .products
        .into_iter()
        .map(convert_product)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CategoryPage::new(category, products, page, page_size))
}

fn convert_category(record: CategoryRecord) -> Category {
    Category {
        id: CategoryId::new(record.id),
        name: record.name,
        slug: record.slug.filter(|s| !s.is_empty()),
        parent_id: record.parent_id.map(CategoryId::new),
        children: record.children.into_iter().map(convert_category).collect(),
        product_count: record.product_count,
    }
}

fn convert_product(record: ProductRecord) -> Result<Product, CatalogueError> {
    if record.price.is_sign_negative() {
        return Err(CatalogueError::Invalid(format!(
            "product {} has negative price {}",
            record.id, record.price
        )));
    }

    let currency_code: CurrencyCode = record
        .currency
        .parse()
        .map_err(|e| CatalogueError::Invalid(format!("product {}: {e}", record.id)))?;

    Ok(Product {
        id: ProductId::new(record.id),
        name: record.name,
        price: Price::new(record.price, currency_code),
        images: record
            .images
            .into_iter()
            .filter(|url| !url.trim().is_empty())
            .collect(),
        sizes: normalize_set(record.sizes),
        colors: normalize_set(record.colors),
        tags: normalize_set(record.tags),
        view_count: record.view_count,
        sales_count: record.sales_count,
        created_at: record.created_at,
        category_id: CategoryId::new(record.category_id),
        seller: record.seller.map(convert_seller),
    })
}

fn convert_seller(record: SellerRecord) -> Seller {
    let display_name = record
        .display_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| record.shop_name.clone());

    Seller {
        id: SellerId::new(record.id),
        shop_name: record.shop_name,
        display_name,
        avatar_url: record.avatar_url,
    }
}

/// Trim values and drop blanks; duplicates collapse in the set.
fn normalize_set(values: Vec<String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(products: &str) -> CategoryResponse {
        serde_json::from_str(&format!(
            r#"{{"category": {{"id": 10, "name": "Dresses", "slug": "", "productCount": 2,
                "children": [{{"id": 11, "name": "Maxi", "parentId": 10}}]}},
               "products": {products}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_convert_page_with_facets() {
        let page = convert_category_page(
            response(
                r#"[{"id": 1, "name": "A", "price": "50", "colors": ["RED", " RED ", ""],
                     "sizes": ["S"], "createdAt": "2026-03-01T10:00:00Z", "categoryId": 11,
                     "seller": {"id": 3, "shopName": "studio-nord"}},
                    {"id": 2, "name": "B", "price": 150, "colors": ["black"],
                     "createdAt": "2026-03-02T10:00:00Z", "categoryId": 10}]"#,
            ),
            2,
            24,
        )
        .unwrap();

        assert_eq!(page.category.id, CategoryId::new(10));
        assert!(page.category.slug.is_none());
        assert_eq!(page.category.children[0].parent_id, Some(CategoryId::new(10)));
        assert_eq!(page.page, 2);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.products[0].colors.len(), 1);
        assert_eq!(page.facets.colors, vec!["black", "RED"]);
        assert_eq!(page.facets.sizes, vec!["S"]);

        let seller = page.products[0].seller.as_ref().unwrap();
        assert_eq!(seller.display_name, "studio-nord");
    }

    #[test]
    fn test_unknown_currency_fails_page() {
        let err = convert_category_page(
            response(
                r#"[{"id": 7, "name": "A", "price": "50", "currency": "XYZ",
                     "createdAt": "2026-03-01T10:00:00Z", "categoryId": 10}]"#,
            ),
            1,
            24,
        )
        .unwrap_err();

        assert!(matches!(err, CatalogueError::Invalid(ref msg) if msg.contains("product 7")));
    }

    #[test]
    fn test_negative_price_fails_page() {
        let err = convert_category_page(
            response(
                r#"[{"id": 8, "name": "A", "price": "-1",
                     "createdAt": "2026-03-01T10:00:00Z", "categoryId": 10}]"#,
            ),
            1,
            24,
        )
        .unwrap_err();

        assert!(matches!(err, CatalogueError::Invalid(_)));
    }
}
