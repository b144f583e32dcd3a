use morph_engine::primitives::{lookup, REGISTRY};
use morph_engine::{
    decode_raw_value, detect, escape_html, extract_raw_value, render_compare, render_value,
    validate_url, CompareTuple, EngineConfig, ItemRef, MorphError, MorphType, RenderContext,
    Renderer, PLACEHOLDER,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn items(names: &[&str]) -> Vec<ItemRef> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| ItemRef::new(i.to_string(), n.to_lowercase(), *n))
        .collect()
}

fn colors(n: usize) -> Vec<String> {
    ["#e41a1c", "#377eb8", "#4daf4a", "#984ea3"]
        .iter()
        .cycle()
        .take(n)
        .map(|c| c.to_string())
        .collect()
}

fn compare_ctx(names: &[&str]) -> RenderContext {
    RenderContext::compare(items(names), colors(names.len())).unwrap()
}

/// A value each primitive can actually read.
fn sample(morph: MorphType, seed: usize) -> Value {
    let n = seed as f64 + 1.0;
    match morph {
        MorphType::Text => json!(format!("Note {}", seed)),
        MorphType::Number => json!(n * 10.0),
        MorphType::Boolean => json!(seed % 2 == 0),
        MorphType::Badge => json!(if seed % 2 == 0 { "Rare" } else { "Common" }),
        MorphType::Tag | MorphType::List => json!(["shared", format!("own-{}", seed)]),
        MorphType::Progress => json!(n * 20.0),
        MorphType::Rating => json!(n),
        MorphType::Range => json!({"min": n, "max": n * 3.0}),
        MorphType::Stats => json!({"length": n, "width": n * 2.0}),
        MorphType::Gauge => json!({"value": n, "max": 10}),
        MorphType::Image => json!(format!("https://img.example.org/{}.png", seed)),
        MorphType::Link => json!(format!("https://example.org/{}", seed)),
        MorphType::Object => json!({"origin": "Andes", "notes": {"depth": seed}}),
        MorphType::Date => json!(format!("2020-01-{:02}", seed + 1)),
        MorphType::Timeline => json!([{"date": format!("199{}", seed), "label": "Described"}]),
        MorphType::Lifecycle => json!(["egg", "larva", "adult"]),
        MorphType::Steps => json!(["Collect", "Dry"]),
        MorphType::Calendar => json!(["Mar", "Apr"]),
        MorphType::Bar | MorphType::Pie => json!({"seeds": n, "insects": 2}),
        MorphType::Sparkline => json!([1, n, 3]),
        MorphType::Radar => json!({"speed": n, "size": 2, "stealth": 3}),
        MorphType::Severity => json!(seed % 5),
        MorphType::Dosage => json!({"dose": n, "unit": "mg"}),
        MorphType::Citation => json!({"title": "Field guide", "year": 2000 + seed}),
        MorphType::Currency => json!({"amount": n, "currency": "EUR"}),
    }
}

// ─── Escaping and URL safety ────────────────────────────────────────────────

#[test]
fn escaped_text_has_no_markup_characters() {
    let hostile = [
        r#"<script>alert("x")</script>"#,
        "' onmouseover='x",
        "a & b < c > d",
        "`backtick` / slash",
    ];
    for s in hostile {
        let out = escape_html(s);
        assert!(!out.contains('<') && !out.contains('>'));
        assert!(!out.contains('"') && !out.contains('\''));
        for (i, _) in out.match_indices('&') {
            let rest = &out[i..];
            assert!(
                ["&amp;", "&lt;", "&gt;", "&quot;", "&#39;", "&#x2F;", "&#x60;"]
                    .iter()
                    .any(|e| rest.starts_with(e)),
                "bare ampersand in {out}"
            );
        }
    }
}

#[test]
fn dangerous_schemes_are_rejected() {
    for url in [
        "javascript:alert(1)",
        "JavaScript:alert(1)",
        "   javascript:alert(1)",
        "java\tscript:alert(1)",
        "DATA:text/html;base64,PHNjcmlwdD4=",
        " vbscript:msgbox",
    ] {
        assert_eq!(validate_url(url), None, "{url:?} should be blocked");
    }
    assert_eq!(validate_url("example.org"), Some("https://example.org".to_string()));
    assert_eq!(validate_url("/local/path"), Some("/local/path".to_string()));
}

#[test]
fn hostile_values_never_reach_markup_unescaped() {
    let payload = json!("<img src=x onerror=alert(1)>");
    for morph in MorphType::ALL {
        let primitive = lookup(morph).unwrap();
        let out = primitive.single(&payload, &RenderContext::single());
        assert!(!out.contains("<img src=x"), "{morph} leaked markup: {out}");
    }
}

// ─── Wrapper and raw values ─────────────────────────────────────────────────

#[test]
fn raw_value_round_trips() {
    let values = [
        json!(42),
        json!("Ursus arctos"),
        json!(["a", "b", {"c": [1, 2.5, null]}]),
        json!({"nested": {"deep": {"list": [true, false]}}, "émoji": "🦉"}),
    ];
    for value in values {
        let markup = render_value(&value, "field", &RenderContext::single());
        let decoded = extract_raw_value(&markup).unwrap().unwrap();
        assert_eq!(decoded, value);
    }
}

#[test]
fn oversized_raw_value_is_omitted_but_field_renders() {
    let big = json!("x".repeat(20_000));
    let markup = render_value(&big, "notes", &RenderContext::single());
    assert!(markup.contains("data-morph=\"text\""));
    assert!(extract_raw_value(&markup).is_none());
}

#[test]
fn decode_errors_are_typed() {
    assert!(matches!(decode_raw_value("not base64!"), Err(MorphError::RawValueDecode(_))));
}

#[test]
fn field_name_is_escaped_in_wrapper() {
    let markup = render_value(&json!(1), "a\"><script>", &RenderContext::single());
    assert!(markup.contains("data-field=\"a&quot;&gt;&lt;script&gt;\""));
}

// ─── Null / empty suppression ───────────────────────────────────────────────

#[test]
fn empty_values_render_nothing_in_any_mode() {
    let contexts = [
        RenderContext::single(),
        RenderContext::grid(items(&["A", "B"])),
        compare_ctx(&["A", "B"]),
    ];
    for ctx in &contexts {
        for value in [Value::Null, json!(""), json!([]), json!({})] {
            for field in ["", "status", "image_url", "timeline"] {
                assert_eq!(render_value(&value, field, ctx), "");
            }
        }
    }
}

// ─── Comparison completeness ────────────────────────────────────────────────

#[test]
fn every_compare_renderer_mentions_every_record() {
    let names = ["Aster", "Bellis", "Carex"];
    let its = items(&names);
    let cols = colors(names.len());
    let ctx = RenderContext::compare(its.clone(), cols.clone()).unwrap();

    for primitive in REGISTRY {
        let readable: Vec<Value> = (0..names.len()).map(|i| sample(primitive.morph, i)).collect();
        let unreadable: Vec<Value> = vec![json!({"?": "?"}), Value::Null, json!(false)];
        for values in [&readable, &unreadable] {
            let tuples: Vec<CompareTuple<'_>> = its
                .iter()
                .zip(values.iter())
                .zip(cols.iter())
                .map(|((item, value), color)| CompareTuple { item, value, color })
                .collect();
            let out = primitive.compare(&tuples, &ctx);
            for (name, color) in names.iter().zip(&cols) {
                assert!(
                    out.contains(name) || out.contains(color.as_str()),
                    "{} dropped {name}: {out}",
                    primitive.morph
                );
            }
        }
    }
}

#[test]
fn frequency_classification_for_tags_and_lists() {
    let ctx = compare_ctx(&["Alpha", "Beta"]);
    for field in ["tags", "notes_list"] {
        let renderer = Renderer::new(
            EngineConfig::default()
                .with_override("tags", MorphType::Tag)
                .with_override("notes_list", MorphType::List),
        );
        let out = renderer.render_compare(field, &[json!(["A", "B"]), json!(["A", "C"])], &ctx);
        assert!(out.contains("data-presence=\"common\"><span class=\"morph-freq-text\">A</span> <span class=\"morph-freq-count\">2/2</span>"));
        assert!(out.contains("data-presence=\"unique\"><span class=\"morph-freq-text\">B</span> <span class=\"morph-freq-count\">1/2</span>"));
        assert!(out.contains("data-presence=\"unique\"><span class=\"morph-freq-text\">C</span> <span class=\"morph-freq-count\">1/2</span>"));
        assert_eq!(out.matches("morph-freq-text\">A<").count(), 1);
    }
}

// ─── Concrete scenarios ─────────────────────────────────────────────────────

#[test]
fn boolean_scenario() {
    let out = render_value(&json!(true), "active", &RenderContext::single());
    assert!(out.contains("data-morph=\"boolean\""));
    assert!(out.contains("morph-boolean--true"));
    assert!(out.contains("✓"));
}

#[test]
fn number_compare_places_average_between_bars() {
    let ctx = compare_ctx(&["Lynx", "Ocelot"]);
    let out = render_compare("body_mass", &[json!(100), json!(50)], &ctx);
    assert!(out.contains("data-morph=\"number\""));
    assert!(out.contains("Lynx") && out.contains("Ocelot"));
    assert!(out.contains("width:100%"));
    assert!(out.contains("width:50%"));
    assert!(out.contains("morph-avg-marker\" style=\"left:75%\""));
}

#[test]
fn number_compare_handles_huge_values() {
    let ctx = compare_ctx(&["Blue whale", "Fin whale"]);
    let out = render_compare("body_mass", &[json!(1e308), json!(5e307)], &ctx);
    assert!(out.contains("<span>Avg 7.5e307</span>"), "{out}");
    assert!(out.contains("morph-avg-marker\" style=\"left:75%\""), "{out}");
}

#[test]
fn compare_treats_missing_values_as_null() {
    let ctx = compare_ctx(&["Lynx", "Ocelot", "Margay"]);
    let out = render_compare("body_mass", &[json!(12)], &ctx);
    assert!(out.contains("Margay"));
    assert_eq!(extract_raw_value(&out).unwrap().unwrap(), json!([12, null, null]));
}

// ─── Registry and detection ─────────────────────────────────────────────────

#[test]
fn registry_is_complete() {
    for morph in MorphType::ALL {
        let primitive = lookup(morph).unwrap_or_else(|| panic!("{morph} not registered"));
        assert_eq!(primitive.morph, morph);
        assert_eq!(morph.as_str().parse::<MorphType>().unwrap(), morph);
    }
}

#[test]
fn detection_is_total_and_stable() {
    let values = [
        Value::Null,
        json!(true),
        json!(-3.5),
        json!(""),
        json!("plain"),
        json!([]),
        json!([null, {}, []]),
        json!({}),
        json!({"a": {"b": {"c": {"d": {"e": 1}}}}}),
    ];
    for v in &values {
        for name in ["", "x", "date", "image", "status", "price", "tags"] {
            let first = detect(name, v);
            assert!(lookup(first).is_some());
            assert_eq!(first, detect(name, v));
        }
    }
}

#[test]
fn primitives_never_panic_on_odd_shapes() {
    let odd = [
        Value::Null,
        json!(f64::MAX),
        json!(-0.0),
        json!(""),
        json!("—"),
        json!([[], [[]], {}]),
        json!({"value": "NaN", "max": 0}),
        json!({"min": 5, "max": 5}),
        json!([{"date": "not a date"}]),
    ];
    for primitive in REGISTRY {
        for v in &odd {
            let _ = primitive.single(v, &RenderContext::single());
            let _ = primitive.single(v, &RenderContext::grid(Vec::new()));
        }
    }
}

#[test]
fn unreadable_values_show_placeholder() {
    let out = lookup(MorphType::Gauge)
        .unwrap()
        .single(&json!("no reading"), &RenderContext::single());
    assert_eq!(out, PLACEHOLDER);
}

// ─── Configuration ──────────────────────────────────────────────────────────

#[test]
fn yaml_config_drives_renderer() {
    let config = EngineConfig::from_yaml(
        "rawValueLimit: 16\nembedRawValues: true\nfieldOverrides:\n  iucn_code: severity\n",
    )
    .unwrap();
    let renderer = Renderer::new(config);
    let out = renderer.render_value(&json!("VU"), "iucn_code", &RenderContext::single());
    assert!(out.contains("data-morph=\"severity\""));
    let long = renderer.render_value(&json!("a fairly long sentence"), "notes", &RenderContext::single());
    assert!(!long.contains("data-raw-value"));
}

#[test]
fn bad_yaml_is_a_config_error() {
    assert!(matches!(
        EngineConfig::from_yaml("rawValueLimit: [oops"),
        Err(MorphError::Config(_))
    ));
}
