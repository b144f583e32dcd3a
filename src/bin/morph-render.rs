use morph_engine::page::field_row;
use morph_engine::{
    render_page, EngineConfig, ItemRef, LogObserver, MorphError, MorphResult, RenderContext,
    Renderer,
};
use serde_json::{Map, Value};
use std::env;
use std::fs;
use std::process;
use std::sync::Arc;

/// Record colors in compare mode, reused cyclically.
const PALETTE: &[&str] = &[
    "#e41a1c", "#377eb8", "#4daf4a", "#984ea3", "#ff7f00", "#a65628", "#f781bf", "#999999",
];

/// Record keys that identify the record rather than describe it.
const IDENTITY_KEYS: &[&str] = &["id", "slug", "name"];

struct Options {
    records_path: String,
    config_path: Option<String>,
    fields: Vec<String>,
    compare: bool,
    grid: bool,
    title: String,
}

fn usage() -> ! {
    eprintln!("Usage: morph-render [options] <records.json>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <file.yaml>   engine configuration");
    eprintln!("  --field <name>         only render this field (repeatable)");
    eprintln!("  --compare              one comparison per field across all records");
    eprintln!("  --grid                 compact card rendering");
    eprintln!("  --title <text>         page title");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  morph-render species.json > species.html");
    eprintln!("  morph-render --compare --field diet species.json");
    process::exit(1);
}

fn parse_args(args: &[String]) -> Options {
    let mut opts = Options {
        records_path: String::new(),
        config_path: None,
        fields: Vec::new(),
        compare: false,
        grid: false,
        title: "Records".to_string(),
    };
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => opts.config_path = Some(iter.next().cloned().unwrap_or_else(|| usage())),
            "--field" => opts.fields.push(iter.next().cloned().unwrap_or_else(|| usage())),
            "--title" => opts.title = iter.next().cloned().unwrap_or_else(|| usage()),
            "--compare" => opts.compare = true,
            "--grid" => opts.grid = true,
            "-h" | "--help" => usage(),
            other if other.starts_with("--") => {
                eprintln!("Unknown option '{}'", other);
                usage();
            }
            path => opts.records_path = path.to_string(),
        }
    }
    if opts.records_path.is_empty() {
        usage();
    }
    opts
}

fn load_config(path: Option<&str>) -> MorphResult<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_yaml(&fs::read_to_string(p)?),
        None => Ok(EngineConfig::default()),
    }
}

fn load_records(path: &str) -> MorphResult<Vec<Map<String, Value>>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Array(arr) => Ok(arr
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(o) => Some(o),
                _ => None,
            })
            .collect()),
        Value::Object(o) => Ok(vec![o]),
        _ => Err(MorphError::RawValueDecode(
            "records file must hold an object or an array of objects".to_string(),
        )),
    }
}

fn item_ref(index: usize, record: &Map<String, Value>) -> ItemRef {
    let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
    let id = text("id").unwrap_or_else(|| index.to_string());
    let slug = text("slug").unwrap_or_else(|| format!("record-{}", index + 1));
    let name = text("name").unwrap_or_default();
    ItemRef::new(id, slug, name)
}

/// Field names in first-seen order, or the requested subset.
fn field_names(records: &[Map<String, Value>], requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    let mut names: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !IDENTITY_KEYS.contains(&key.as_str()) && !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn run(opts: &Options) -> MorphResult<String> {
    let config = load_config(opts.config_path.as_deref())?;
    let renderer = Renderer::new(config).with_observer(Arc::new(LogObserver));
    let records = load_records(&opts.records_path)?;
    let items: Vec<ItemRef> = records.iter().enumerate().map(|(i, r)| item_ref(i, r)).collect();
    let fields = field_names(&records, &opts.fields);

    let mut body = String::new();
    if opts.compare {
        let colors: Vec<String> = (0..items.len())
            .map(|i| PALETTE[i % PALETTE.len()].to_string())
            .collect();
        let ctx = RenderContext::compare(items, colors)?;
        for field in &fields {
            let values: Vec<Value> = records
                .iter()
                .map(|r| r.get(field).cloned().unwrap_or(Value::Null))
                .collect();
            let markup = renderer.try_render_compare(field, &values, &ctx)?;
            if !markup.is_empty() {
                body.push_str(&field_row(field, &markup));
            }
        }
    } else {
        let ctx = if opts.grid {
            RenderContext::grid(items.clone())
        } else {
            RenderContext::single()
        };
        for (record, item) in records.iter().zip(&items) {
            let heading = if item.name.is_empty() { &item.slug } else { &item.name };
            body.push_str(&format!(
                "<section class=\"morph-record\"><h2>{}</h2>",
                morph_engine::escape_html(heading)
            ));
            for field in &fields {
                let Some(value) = record.get(field) else {
                    continue;
                };
                let markup = renderer.try_render_value(value, field, &ctx)?;
                if !markup.is_empty() {
                    body.push_str(&field_row(field, &markup));
                }
            }
            body.push_str("</section>");
        }
    }
    Ok(render_page(&opts.title, &body))
}

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }
    let opts = parse_args(&args[1..]);

    match run(&opts) {
        Ok(html) => print!("{}", html),
        Err(e) => {
            eprintln!("✗ {}: {}", opts.records_path, e);
            process::exit(1);
        }
    }
}
