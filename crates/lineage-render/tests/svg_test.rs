use lineage_core::config::LabelStrategy;
use lineage_core::{DataSources, FsFetcher, Person, TreeConfig, TreeData, load_tree_data_sync};
use lineage_render::html::{HtmlRenderOptions, render_tree_html};
use lineage_render::layout_tree;
use lineage_render::svg::{SvgRenderOptions, render_tree_svg, target_transform};
use lineage_render::text::DeterministicTextMeasurer;
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture_data() -> TreeData {
    let fetcher = FsFetcher::new(workspace_root().join("fixtures").join("family"));
    load_tree_data_sync(&fetcher, &DataSources::default()).expect("fixture loads")
}

fn render(data: &TreeData, config: &TreeConfig) -> String {
    let layout =
        layout_tree(data, config, &DeterministicTextMeasurer::default()).expect("layout ok");
    render_tree_svg(&layout, data, config, &SvgRenderOptions::default()).expect("svg ok")
}

fn has_class(node: &roxmltree::Node<'_, '_>, class: &str) -> bool {
    node.attribute("class")
        .is_some_and(|c| c.split_whitespace().any(|t| t == class))
}

fn node_group<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    id: &str,
) -> roxmltree::Node<'a, 'input> {
    doc.descendants()
        .find(|n| has_class(n, "node") && n.attribute("data-id") == Some(id))
        .unwrap_or_else(|| panic!("node {id} rendered"))
}

#[test]
fn fixture_svg_is_well_formed_and_complete() {
    let data = fixture_data();
    let svg = render(&data, &TreeConfig::default());
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");

    let root = doc.root_element();
    assert!(root.has_tag_name("svg"));
    assert_eq!(root.attribute("data-min-scale"), Some("0.1"));
    assert_eq!(root.attribute("data-max-scale"), Some("4"));
    assert!(root.attribute("data-fit-transform").is_some());

    let nodes: Vec<_> = doc.descendants().filter(|n| has_class(n, "node")).collect();
    assert_eq!(nodes.len(), 8);
    let lines = doc
        .descendants()
        .filter(|n| has_class(n, "partner-line"))
        .count();
    assert_eq!(lines, 2);
    let droplets = doc.descendants().filter(|n| has_class(n, "droplet")).count();
    assert_eq!(droplets, 3);
    // One trunk per group plus one branch per child: [3,5], [6,7], [8].
    let paths = doc
        .descendants()
        .filter(|n| has_class(n, "parent-link"))
        .count();
    assert_eq!(paths, 3 + 5);
}

#[test]
fn nodes_link_to_detail_pages_and_carry_tooltips() {
    let data = fixture_data();
    let svg = render(&data, &TreeConfig::default());
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let alexei = node_group(&doc, "3");
    let link = alexei.parent_element().unwrap();
    assert!(link.has_tag_name("a"));
    assert_eq!(link.attribute("href"), Some("./person.html?id=3"));
    assert_eq!(link.attribute("target"), Some("_blank"));
    assert_eq!(
        alexei.attribute("data-tooltip"),
        Some("Алексей\nOrlov\n† 01.06.1944")
    );
    assert_eq!(alexei.attribute("data-color"), Some("#4a90d9"));
    assert!(has_class(&alexei, "gender-male"));

    let title = alexei.children().find(|n| n.has_tag_name("title")).unwrap();
    assert_eq!(title.text(), Some("Алексей\nOrlov\n† 01.06.1944"));

    let nikolai = node_group(&doc, "8");
    assert!(has_class(&nikolai, "gender-unknown"));
    assert_eq!(nikolai.attribute("data-color"), Some("#999999"));
}

#[test]
fn photos_fall_back_to_placeholder() {
    let data = fixture_data();
    let svg = render(&data, &TreeConfig::default());
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let image_of = |id: &str| {
        node_group(&doc, id)
            .children()
            .find(|n| n.has_tag_name("image"))
            .and_then(|n| n.attribute("href"))
            .map(str::to_string)
    };
    assert_eq!(image_of("1").as_deref(), Some("images/pyotr.jpg"));
    assert_eq!(
        image_of("2").as_deref(),
        Some("https://placehold.co/40x40/bbbbbb/333333?text=?")
    );
}

#[test]
fn long_names_split_into_two_tspans() {
    let data = fixture_data();
    let svg = render(&data, &TreeConfig::default());
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let name_lines = |id: &str| -> Vec<String> {
        node_group(&doc, id)
            .descendants()
            .filter(|n| n.has_tag_name("tspan"))
            .filter_map(|n| n.text().map(str::to_string))
            .collect()
    };
    let svetlana = name_lines("7");
    assert_eq!(svetlana.len(), 2);
    assert_eq!(svetlana.concat(), "Светлана Алексеевна");
    assert_eq!(name_lines("2"), vec!["Мария".to_string()]);

    let id_label = node_group(&doc, "7")
        .children()
        .find(|n| has_class(n, "person-id"))
        .unwrap();
    assert_eq!(id_label.text(), Some("7"));
    assert_eq!(id_label.attribute("y"), Some("62"));
}

#[test]
fn fitted_view_keeps_bottom_row_labels_on_screen() {
    let mut a = Person::new("11", 1);
    let mut b = Person::new("12", 1);
    a.name = Some("Konstantinopolsky".to_string());
    b.name = Some("Aleksandrovna".to_string());
    let data = TreeData::new(vec![a, b]);
    let config = TreeConfig::default();
    let layout = layout_tree(&data, &config, &DeterministicTextMeasurer::default()).unwrap();
    let fit = target_transform(&layout, &config).expect("fit");

    let svg = render(&data, &config);
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert_eq!(
        doc.root_element().attribute("data-fit-transform"),
        Some(fit.to_svg_attr().as_str())
    );

    for p in &layout.persons {
        let id_label = node_group(&doc, p.id.as_str())
            .children()
            .find(|n| has_class(n, "person-id"))
            .unwrap();
        let id_y: f64 = id_label.attribute("y").unwrap().parse().unwrap();
        assert_eq!(Some(id_y), p.label.id_y);

        let (_, screen_bottom) = fit.apply((p.x, p.y + p.label.bottom));
        assert!(screen_bottom <= config.layout.height);
        let (left, _) = fit.apply((p.x - p.label.width / 2.0, p.y));
        let (right, _) = fit.apply((p.x + p.label.width / 2.0, p.y));
        assert!(left >= 0.0 && right <= config.layout.width);
    }
}

#[test]
fn ellipsis_strategy_keeps_one_line() {
    let data = fixture_data();
    let mut config = TreeConfig::default();
    config.labels.strategy = LabelStrategy::Ellipsis;
    config.labels.show_id = false;
    let svg = render(&data, &config);
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let node = node_group(&doc, "7");
    let tspans: Vec<_> = node
        .descendants()
        .filter(|n| n.has_tag_name("tspan"))
        .collect();
    assert_eq!(tspans.len(), 1);
    assert!(tspans[0].text().unwrap().ends_with('…'));
    assert!(!svg.contains("person-id"));
}

#[test]
fn hosted_links_use_repository_prefix_and_mark_detail_pages() {
    let data = fixture_data();
    let detail = tempfile::tempdir().unwrap();
    std::fs::create_dir(detail.path().join("id1_pyotr")).unwrap();

    let mut config = TreeConfig::default();
    config.links.host = "someone.github.io".to_string();
    config.links.detail_root = Some(detail.path().to_path_buf());
    let svg = render(&data, &config);
    let doc = roxmltree::Document::parse(&svg).unwrap();

    let pyotr = node_group(&doc, "1");
    assert!(has_class(&pyotr, "has-detail"));
    assert_eq!(
        pyotr.parent_element().unwrap().attribute("href"),
        Some("/family-tree_v2/person.html?id=1")
    );
    assert!(!has_class(&node_group(&doc, "2"), "has-detail"));
}

#[test]
fn empty_tree_keeps_identity_transform() {
    let svg = render(&TreeData::default(), &TreeConfig::default());
    let doc = roxmltree::Document::parse(&svg).unwrap();
    assert!(doc.root_element().attribute("data-fit-transform").is_none());
    let viewport = doc
        .descendants()
        .find(|n| has_class(n, "viewport"))
        .unwrap();
    assert_eq!(viewport.attribute("transform"), Some("translate(0,0) scale(1)"));
}

#[test]
fn invalid_scale_extent_is_rejected() {
    let mut config = TreeConfig::default();
    config.svg.min_scale = 5.0;
    let data = TreeData::default();
    let layout = layout_tree(&data, &config, &DeterministicTextMeasurer::default()).unwrap();
    let err = render_tree_svg(&layout, &data, &config, &SvgRenderOptions::default()).unwrap_err();
    assert!(err.to_string().contains("scale extent"));
}

#[test]
fn html_page_embeds_viewer_state() {
    let data = fixture_data();
    let config = TreeConfig::default();
    let layout = layout_tree(&data, &config, &DeterministicTextMeasurer::default()).unwrap();
    let html = render_tree_html(&layout, &data, &config, &HtmlRenderOptions::default()).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"<g class="viewport" transform="translate(0,0) scale(1)">"#));

    let open = r#"<script type="application/json" id="lineage-viewer">"#;
    let start = html.find(open).unwrap() + open.len();
    let end = start + html[start..].find("</script>").unwrap();
    let viewer: serde_json::Value = serde_json::from_str(&html[start..end]).unwrap();
    assert_eq!(viewer["durationMs"], 750);
    assert_eq!(viewer["extent"]["min"], 0.1);
    assert_eq!(viewer["initial"]["k"], 1.0);
    let target = target_transform(&layout, &config).unwrap();
    let near =
        |v: &serde_json::Value, expected: f64| (v.as_f64().unwrap() - expected).abs() < 1e-9;
    assert!(near(&viewer["target"]["k"], target.k));
    assert!(near(&viewer["target"]["x"], target.x));
}
