#![forbid(unsafe_code)]

//! `lineage` renders a family tree from a spreadsheet export plus hand-curated per-generation
//! order and coordinate tables.
//!
//! # Features
//!
//! - `render`: enable layout + SVG/HTML rendering (`lineage::render`)
//! - `raster`: enable PNG output via pure-Rust SVG rasterization

pub use lineage_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use lineage_render::html::{HtmlRenderOptions, ViewerConfig};
    pub use lineage_render::model::TreeLayout;
    pub use lineage_render::svg::SvgRenderOptions;
    pub use lineage_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use lineage_render::viewport::{ScaleExtent, Transition, Viewport, ZoomTransform};
    pub use lineage_render::{LayoutOptions, layout_to_json, layout_tree};

    use lineage_core::{DataSources, ResourceFetcher, TreeConfig, TreeData};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Load(#[from] lineage_core::Error),
        #[error(transparent)]
        Render(#[from] lineage_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Converts an arbitrary string into a conservative SVG `id` token, so several trees can be
    /// inlined into one page without their clip-path ids colliding.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "tree-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 5);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_';
            out.push(if ok { ch } else { '-' });
        }
        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "tree-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "tree" {
            return "tree-untitled".to_string();
        }
        out.to_string()
    }

    /// Bundles the tree configuration with layout/SVG options so callers pass one value around.
    ///
    /// Loading is the only async step; everything after it is CPU-bound.
    #[derive(Debug, Clone, Default)]
    pub struct TreeRenderer {
        pub config: TreeConfig,
        pub layout: LayoutOptions,
        pub svg: SvgRenderOptions,
    }

    impl TreeRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_config(mut self, config: TreeConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.svg.diagram_id = sanitize_svg_id(diagram_id);
            self
        }

        pub fn sources(&self) -> &DataSources {
            &self.config.sources
        }

        pub async fn load(&self, fetcher: &dyn ResourceFetcher) -> Result<TreeData> {
            Ok(lineage_core::load_tree_data(fetcher, &self.config.sources).await?)
        }

        /// Synchronous load helper (drives the loader on a local executor).
        pub fn load_sync(&self, fetcher: &dyn ResourceFetcher) -> Result<TreeData> {
            Ok(lineage_core::load_tree_data_sync(
                fetcher,
                &self.config.sources,
            )?)
        }

        pub fn layout(&self, data: &TreeData) -> Result<TreeLayout> {
            Ok(layout_tree(data, &self.config, self.layout.text_measurer.as_ref())?)
        }

        pub fn render_svg(&self, data: &TreeData) -> Result<String> {
            let layout = self.layout(data)?;
            self.render_layout_svg(&layout, data)
        }

        pub fn render_layout_svg(&self, layout: &TreeLayout, data: &TreeData) -> Result<String> {
            Ok(lineage_render::svg::render_tree_svg(layout, data, &self.config, &self.svg)?)
        }

        pub fn render_html(&self, data: &TreeData, title: &str) -> Result<String> {
            let layout = self.layout(data)?;
            let options = HtmlRenderOptions {
                title: title.to_string(),
                svg: SvgRenderOptions {
                    apply_fit: false,
                    ..self.svg.clone()
                },
            };
            Ok(lineage_render::html::render_tree_html(&layout, data, &self.config, &options)?)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            data: &TreeData,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_png_sync(self, data, raster)
        }
    }
}
