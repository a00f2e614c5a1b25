use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use unnest_spec::report::build_report_data;
use unnest_spec::spec::spec_from_json;
use unnest_spec::{MatchKind, Spec, match_partial, match_spec};

fn orders_spec() -> Spec {
    spec_from_json(&json!({
        "type": "object",
        "children": [
            { "as": "customer", "include": ["customer"], "process": "asis" },
            {
                "include": ["orders"],
                "stack": "stack",
                "children": [{
                    "ix_name": "order_ix",
                    "children": [
                        { "as": "sku", "include": ["sku"], "process": "asis" },
                        { "as": "tags", "include": ["tags"], "process": "paste" }
                    ],
                    "groups": [["price", [
                        { "include": ["net"], "process": "asis" },
                        { "as": "gross_total", "include": ["gross"], "process": "asis" }
                    ]]]
                }]
            }
        ]
    }))
    .expect("valid description")
}

fn orders_input() -> Value {
    json!({
        "customer": "ada",
        "orders": [
            { "sku": "A-1", "tags": ["new", "promo"], "net": 10, "gross": 12 },
            { "sku": "B-2", "tags": [], "net": 5, "gross": 6, "note": "gift" }
        ],
        "internal": { "sku": "hidden" }
    })
}

#[test]
fn description_to_records() {
    let spec = orders_spec();
    let input = orders_input();

    let matches = match_spec(&spec, &input).unwrap();
    let got: Vec<_> = matches
        .iter()
        .map(|m| (m.kind, m.ix, m.spec_name, m.elem_name))
        .collect();

    assert_eq!(
        got,
        vec![
            (MatchKind::Value, 0, Some("customer"), Some("customer")),
            (MatchKind::Ordinal, 0, Some("order_ix"), None),
            (MatchKind::Value, 0, Some("sku"), Some("sku")),
            (MatchKind::Value, 1, Some("tags"), Some("tags")),
            (MatchKind::Value, 2, Some("price"), Some("net")),
            (MatchKind::Value, 3, Some("gross_total"), Some("gross")),
            (MatchKind::Ordinal, 1, Some("order_ix"), None),
            (MatchKind::Value, 0, Some("sku"), Some("sku")),
            (MatchKind::Value, 1, Some("tags"), Some("tags")),
            (MatchKind::Value, 2, Some("price"), Some("net")),
            (MatchKind::Value, 3, Some("gross_total"), Some("gross")),
        ]
    );
}

#[test]
fn report_surfaces_processed_values() {
    let spec = orders_spec();
    let input = orders_input();
    let data = build_report_data(&spec, &match_partial(&spec, &input));

    let values: Vec<_> = data
        .records
        .iter()
        .filter(|r| r.spec_name.as_deref() == Some("tags"))
        .map(|r| r.value.clone())
        .collect();
    assert_eq!(values, vec![Some(json!("new,promo")), Some(json!(""))]);
    assert_eq!(data.totals.records, 11);
    assert_eq!(data.totals.ordinals, 2);
}

#[test]
fn malformed_orders_keep_sibling_records() {
    let spec = orders_spec();
    let input = json!({
        "customer": "bob",
        "orders": [ "not-an-order", { "sku": "C-3", "net": 1, "gross": 2 } ]
    });

    assert!(match_spec(&spec, &input).is_err());

    let report = match_partial(&spec, &input);
    assert_eq!(report.mismatches.len(), 1);
    let skus: Vec<_> = report
        .matches
        .iter()
        .filter(|m| m.spec_name == Some("sku"))
        .map(|m| m.obj.clone())
        .collect();
    assert_eq!(skus, vec![json!("C-3")]);
    assert_eq!(report.matches[0].obj, &json!("bob"));
}

#[test]
fn one_spec_many_threads() {
    let spec = orders_spec();
    let inputs: Vec<Value> = (0..8)
        .map(|i| {
            let orders: Vec<Value> = (0..i)
                .map(|j| json!({ "sku": j, "net": j, "gross": j }))
                .collect();
            json!({ "customer": format!("c{}", i), "orders": orders })
        })
        .collect();

    let counts: Vec<usize> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let spec = &spec;
                s.spawn(move || match_spec(spec, input).unwrap().len())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // customer + per order: ordinal, sku, net, gross
    let expected: Vec<usize> = (0..8).map(|i| 1 + 4 * i).collect();
    assert_eq!(counts, expected);
}
