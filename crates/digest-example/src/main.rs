//! Renders a newsletter digest to stdout, the way a background job would
//! produce an email body: no HTTP request in flight, a simulated route, and
//! the markup captured as a string instead of written to a response.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use serde::Serialize;

use offstage::{
    JinjaViewLocator, NullTempDataProvider, RenderOverrides, RequestContext, RouteData, Services,
    ViewRenderer,
};

#[derive(Parser)]
#[command(name = "digest", about = "Render a newsletter digest to stdout")]
struct Args {
    /// Directory holding the view templates.
    #[arg(long, default_value = "views")]
    views: PathBuf,

    /// View to render.
    #[arg(long, default_value = "digest")]
    view: String,

    /// Simulated controller route value.
    #[arg(long, default_value = "mail")]
    controller: String,
}

#[derive(Serialize)]
struct Story {
    title: String,
    url: String,
}

#[derive(Serialize)]
struct Digest {
    subject: String,
    stories: Vec<Story>,
}

/// Stand-in for an application service reachable during the render job.
struct Mailer {
    from: String,
}

fn sample_digest() -> Digest {
    Digest {
        subject: "This week, offstage".to_string(),
        stories: vec![
            Story {
                title: "Rendering views without a request".to_string(),
                url: "https://example.com/offstage".to_string(),
            },
            Story {
                title: "Temp data for job pipelines".to_string(),
                url: "https://example.com/temp-data".to_string(),
            },
        ],
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut locator = JinjaViewLocator::new();
    locator
        .add_view_dir(&args.views)
        .with_context(|| format!("registering view directory {}", args.views.display()))?;

    let mut services = Services::new();
    services.insert(Mailer {
        from: "digest@example.com".to_string(),
    });

    let renderer = ViewRenderer::new(
        Arc::new(locator),
        Arc::new(NullTempDataProvider),
        services.clone(),
    );

    let overrides = RenderOverrides::new()
        .with_request(RequestContext::new(services.clone()).with_path("/jobs/digest"))
        .with_route(RouteData::new().with("controller", args.controller));

    let markup = renderer.render_with(&args.view, &sample_digest(), &overrides)?;

    let mailer = services.get::<Mailer>().expect("registered above");
    eprintln!("would send from {}:", mailer.from);
    println!("{markup}");
    Ok(())
}
