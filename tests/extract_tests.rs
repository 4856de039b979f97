use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use tld_extract_r::{
    parse_rules_from_file, ExtractError, ExtractionPolicy, Extractor, ExtractorOptions,
    FileRuleLoader, RuleSet, Section, SuffixMatcher,
};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/public_suffix_list.dat")
}

fn rules() -> Arc<RuleSet> {
    Arc::new(parse_rules_from_file(fixture_path()).unwrap())
}

fn extractor_with(policy: ExtractionPolicy) -> Extractor {
    Extractor::with_options(rules(), ExtractorOptions::new().with_policy(policy))
}

// ============================================================================
// Splitting
// ============================================================================

#[test]
fn test_split_full_url() {
    let e = Extractor::new(rules());
    let r = e.parse("http://forums.news.cnn.co.uk/path/page.html?x=1");
    assert_eq!(r.subdomain(), Some("forums.news"));
    assert_eq!(r.hostname(), Some("cnn"));
    assert_eq!(r.suffix(), Some("co.uk"));
    assert_eq!(r.full_host(), "forums.news.cnn.co.uk");
    assert_eq!(r.subdomains(), vec!["forums", "news"]);
    assert_eq!(r.to_string(), "forums.news.cnn.co.uk");
}

#[test]
fn test_private_suffix() {
    let e = Extractor::new(rules());
    let r = e.parse("my-app.github.io");
    assert_eq!(r.hostname(), Some("my-app"));
    assert_eq!(r.suffix(), Some("github.io"));
    assert_eq!(r.section(), Some(Section::Private));

    let r = e.parse("ec2-1-2-3-4.eu-west-1.compute.amazonaws.com");
    assert_eq!(r.hostname(), Some("ec2-1-2-3-4"));
    assert_eq!(r.suffix(), Some("eu-west-1.compute.amazonaws.com"));
}

#[test]
fn test_trailing_dot_is_dropped() {
    let e = Extractor::new(rules());
    let r = e.parse("www.example.com.");
    assert_eq!(r.registrable_domain().as_deref(), Some("example.com"));
    assert_eq!(r.subdomain(), Some("www"));
}

#[test]
fn test_no_suffix_when_fallback_disabled() {
    let e = extractor_with(ExtractionPolicy::ALLOW_ICANN | ExtractionPolicy::ALLOW_PRIVATE);
    let r = e.parse("www.intranet.local");
    assert_eq!(r.suffix(), None);
    assert_eq!(r.hostname(), Some("local"));
    assert_eq!(r.subdomain(), Some("www.intranet"));
    assert!(!r.is_valid_domain());
}

#[test]
fn test_exception_override() {
    let e = Extractor::new(rules());
    assert_eq!(e.parse("ck").suffix(), None);
    assert_eq!(e.parse("test.ck").suffix(), None);
    assert_eq!(e.parse("b.test.ck").suffix(), Some("test.ck"));

    let r = e.parse("www.ck");
    assert_eq!(r.suffix(), Some("ck"));
    assert_eq!(r.hostname(), Some("www"));
}

// ============================================================================
// Policy
// ============================================================================

#[test]
fn test_policy_without_private_ignores_private_rules() {
    let e = extractor_with(
        ExtractionPolicy::ALLOW_ICANN | ExtractionPolicy::ALLOW_NOT_EXISTING_SUFFIXES,
    );
    let r = e.parse("a.blogspot.com");
    assert_eq!(r.suffix(), Some("com"));
    assert_eq!(r.hostname(), Some("blogspot"));
    assert_eq!(r.subdomain(), Some("a"));

    let all = Extractor::new(rules());
    assert_eq!(all.parse("a.blogspot.com").suffix(), Some("blogspot.com"));
}

#[test]
fn test_private_only_policy() {
    let e = extractor_with(ExtractionPolicy::ALLOW_PRIVATE);
    assert_eq!(e.parse("a.blogspot.co.uk").suffix(), Some("blogspot.co.uk"));
    assert_eq!(e.parse("www.example.co.uk").suffix(), None);
}

#[test]
fn test_suffix_monotonicity() {
    let both = SuffixMatcher::new(
        rules(),
        ExtractionPolicy::ALLOW_ICANN | ExtractionPolicy::ALLOW_PRIVATE,
    );
    let icann = SuffixMatcher::new(rules(), ExtractionPolicy::ALLOW_ICANN);

    for host in [
        "www.example.com",
        "a.blogspot.com",
        "a.b.blogspot.co.uk",
        "x.uk.com",
        "ec2.eu.compute.amazonaws.com",
        "user.github.io",
        "www.city.kobe.jp",
        "a.b.c.mm",
        "www.ck",
        "example.example",
    ] {
        let with_private = both.find(host).labels;
        let icann_only = icann.find(host).labels;
        assert!(
            icann_only <= with_private,
            "{}: icann {} > both {}",
            host,
            icann_only,
            with_private
        );
    }
}

// ============================================================================
// IP literals and malformed input
// ============================================================================

#[test]
fn test_ipv6_with_port() {
    let e = Extractor::new(rules());
    let r = e.parse("[2001:0:9d38:6abd:3431:eb:3cbd:22ba]:443");
    assert!(r.is_ip());
    assert_eq!(r.full_host(), "2001:0:9d38:6abd:3431:eb:3cbd:22ba");
    assert_eq!(r.subdomain(), None);
    assert_eq!(r.hostname(), None);
    assert_eq!(r.suffix(), None);
}

#[test]
fn test_ipv4() {
    let e = Extractor::new(rules());
    let r = e.parse("https://10.0.0.1:8443/admin");
    assert!(r.is_ip());
    assert_eq!(r.full_host(), "10.0.0.1");
    assert!(!r.is_valid_domain());

    let r = e.parse("1.2.3.4.");
    assert!(r.is_ip());
    assert_eq!(r.full_host(), "1.2.3.4");
    assert_eq!(r.suffix(), None);
    assert_eq!(r.hostname(), None);
}

#[test]
fn test_malformed_input() {
    let e = Extractor::new(rules());
    let long_label = format!("{}.com", "a".repeat(64));
    let long_domain = vec!["a".repeat(63); 5].join(".");
    let inputs: Vec<Option<&str>> = vec![
        None,
        Some(""),
        Some("   "),
        Some("test..com"),
        Some(".com"),
        Some("."),
        Some(long_label.as_str()),
        Some(long_domain.as_str()),
        Some("example.com:abc"),
        Some("http://user@example.co.uk:port/"),
    ];

    for input in inputs {
        let r = e.parse(input);
        assert_eq!(r.subdomain(), None, "{:?}", input);
        assert_eq!(r.hostname(), None, "{:?}", input);
        assert_eq!(r.suffix(), None, "{:?}", input);
        assert!(!r.is_ip(), "{:?}", input);
        assert!(!r.is_valid_domain(), "{:?}", input);
    }
}

// ============================================================================
// Result views
// ============================================================================

#[test]
fn test_result_json_and_map() {
    let e = Extractor::new(rules());
    let r = e.parse("www.食狮.公司.cn");
    assert_eq!(
        r.to_json().unwrap(),
        r#"{"subdomain":"www","hostname":"食狮","suffix":"公司.cn"}"#
    );

    let map = r.to_map();
    assert_eq!(map.len(), 3);
    assert_eq!(map["suffix"].as_deref(), Some("公司.cn"));

    let value = serde_json::to_value(&e.parse("example.com")).unwrap();
    assert_eq!(value["hostname"], "example");
    assert!(value["subdomain"].is_null());
}

// ============================================================================
// Construction and sharing
// ============================================================================

#[test]
fn test_from_file_and_loader() {
    let e = Extractor::from_file(fixture_path(), ExtractorOptions::default()).unwrap();
    assert_eq!(e.policy(), ExtractionPolicy::default());

    let loader = FileRuleLoader::new(fixture_path());
    let e = Extractor::from_loader(&loader, ExtractorOptions::default()).unwrap();
    assert_eq!(
        e.parse("www.example.co.uk").registrable_domain().as_deref(),
        Some("example.co.uk")
    );
}

#[test]
fn test_from_missing_file() {
    let result = Extractor::from_file(
        "/nonexistent/tld_extract_r/list.dat",
        ExtractorOptions::default(),
    );
    assert!(matches!(result, Err(ExtractError::LoadError { .. })));
}

#[test]
fn test_builder_without_source() {
    let result = Extractor::builder()
        .policy(ExtractionPolicy::ALLOW_ICANN)
        .build();
    assert!(matches!(result, Err(ExtractError::NotConfigured(_))));
}

#[test]
fn test_concurrent_parse() {
    let extractor = Arc::new(Extractor::new(rules()));
    let hosts = [
        ("www.example.com", "example.com"),
        ("a.b.c.kobe.jp", "b.c.kobe.jp"),
        ("foo.blogspot.com", "foo.blogspot.com"),
        ("www.食狮.中国", "食狮.中国"),
    ];

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let extractor = Arc::clone(&extractor);
            thread::spawn(move || {
                for _ in 0..100 {
                    let (host, expected) = hosts[i % hosts.len()];
                    let r = extractor.parse(host);
                    assert_eq!(r.registrable_domain().as_deref(), Some(expected));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
