use super::*;

#[test]
fn build_url_appends_params() {
    let url = build_url(
        "https://alkoteka.com/web-api/v1/product",
        &[("city_uuid", "abc"), ("page", "1")],
    )
    .unwrap();
    assert_eq!(
        url,
        "https://alkoteka.com/web-api/v1/product?city_uuid=abc&page=1"
    );
}

#[test]
fn build_url_keeps_existing_query() {
    let url = build_url(
        "https://alkoteka.com/web-api/v1/city?city_uuid=396df2b5",
        &[("page", "2")],
    )
    .unwrap();
    assert_eq!(
        url,
        "https://alkoteka.com/web-api/v1/city?city_uuid=396df2b5&page=2"
    );
}

#[test]
fn build_url_without_params_is_unchanged() {
    let url = build_url("https://alkoteka.com/web-api/v1/city?city_uuid=x", &[]).unwrap();
    assert_eq!(url, "https://alkoteka.com/web-api/v1/city?city_uuid=x");
}

#[test]
fn build_url_rejects_relative_base() {
    let err = build_url("web-api/v1/product", &[]).unwrap_err();
    assert!(
        matches!(err, ScraperError::InvalidUrl { .. }),
        "expected InvalidUrl, got: {err:?}"
    );
}

#[test]
fn referer_for_root_has_trailing_slash() {
    assert_eq!(referer_for("https://alkoteka.com", ""), "https://alkoteka.com/");
    assert_eq!(referer_for("https://alkoteka.com/", ""), "https://alkoteka.com/");
}

#[test]
fn referer_for_joins_path() {
    assert_eq!(
        referer_for("https://alkoteka.com", "catalog/vino"),
        "https://alkoteka.com/catalog/vino"
    );
}

#[test]
fn extract_domain_returns_host() {
    assert_eq!(
        extract_domain("https://alkoteka.com/web-api/v1/product?page=1"),
        "alkoteka.com"
    );
}

#[test]
fn extract_domain_falls_back_to_input() {
    assert_eq!(extract_domain("not a url"), "not a url");
}

#[test]
fn client_builds_with_zero_retries() {
    assert!(CatalogClient::new(5, "alkoteka-test", 0, 0).is_ok());
}
