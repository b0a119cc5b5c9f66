//! Segment file pipeline.
//!
//! This example cleans and validates `~`-terminated segment files:
//! 1. Import each `.edi` file into a list of segments
//! 2. Trim whitespace and drop comment segments
//! 3. Validate segment structure (warnings and failures)
//! 4. Uppercase segment identifiers
//! 5. Export the cleaned segments into an output directory
//!
//! Run with `RUST_LOG=weft=debug` to see per-behavior timing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use weft::prelude::*;

type SegmentContext = Context<Vec<String>>;

struct SegmentFileAdapter {
    output_dir: PathBuf,
}

#[async_trait]
impl ContextAdapter for SegmentFileAdapter {
    type Context = SegmentContext;
    type Input = Path;
    type Output = PathBuf;

    fn is_accepted_format(&self, input: &Path) -> bool {
        input.extension().is_some_and(|ext| ext == "edi")
    }

    async fn import(
        &self,
        input: &Path,
        cancel: &CancellationToken,
    ) -> Result<Imported<SegmentContext>, CapabilityError> {
        cancel.check()?;
        if !self.is_accepted_format(input) {
            return Err(CapabilityError::UnsupportedInput(input.display().to_string()));
        }

        let raw = tokio::fs::read_to_string(input).await?;
        let segments = raw
            .split('~')
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect();

        Ok(Imported::named(Context::new(segments), input.input_label()))
    }

    async fn export(
        &self,
        ctx: &SegmentContext,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, CapabilityError> {
        cancel.check()?;
        let name = format!("cleaned-{}.edi", ctx.payload().len());
        let path = self.output_dir.join(name);
        let mut body = ctx.payload().join("~");
        body.push('~');
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }

    async fn setup(&self, _cancel: &CancellationToken) -> Result<(), CapabilityError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        Ok(())
    }
}

#[derive(Debug)]
struct TrimSegments;

#[async_trait]
impl Behavior<SegmentContext> for TrimSegments {
    async fn handle(
        &self,
        ctx: &mut SegmentContext,
        _cancel: &CancellationToken,
    ) -> Result<(), CapabilityError> {
        for segment in ctx.payload_mut() {
            *segment = segment.trim().to_string();
        }
        Ok(())
    }
}

#[derive(Debug)]
struct DropComments;

#[async_trait]
impl Behavior<SegmentContext> for DropComments {
    async fn handle(
        &self,
        ctx: &mut SegmentContext,
        _cancel: &CancellationToken,
    ) -> Result<(), CapabilityError> {
        let before = ctx.payload().len();
        ctx.payload_mut().retain(|s| !s.starts_with('#'));
        let dropped = before - ctx.payload().len();
        if dropped > 0 {
            ctx.record_success(format!("Dropped {dropped} comment segments"));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ValidateSegments;

#[async_trait]
impl Behavior<SegmentContext> for ValidateSegments {
    async fn handle(
        &self,
        ctx: &mut SegmentContext,
        _cancel: &CancellationToken,
    ) -> Result<(), CapabilityError> {
        let mut warnings = Vec::new();
        for (index, segment) in ctx.payload().iter().enumerate() {
            if !segment.contains('*') {
                warnings.push(format!("Segment {index} has no elements"));
            }
        }
        for warning in warnings {
            ctx.record_warning(warning);
        }

        match ctx.payload().first() {
            Some(header) if header.to_uppercase().starts_with("ISA") => Ok(()),
            _ => Err(CapabilityError::msg("missing ISA header segment")),
        }
    }
}

#[derive(Debug)]
struct UppercaseIdentifiers;

#[async_trait]
impl Behavior<SegmentContext> for UppercaseIdentifiers {
    async fn handle(
        &self,
        ctx: &mut SegmentContext,
        _cancel: &CancellationToken,
    ) -> Result<(), CapabilityError> {
        for segment in ctx.payload_mut() {
            if let Some((id, rest)) = segment.split_once('*') {
                *segment = format!("{}*{rest}", id.to_uppercase());
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let work_dir = std::env::temp_dir().join("weft-segment-demo");
    tokio::fs::create_dir_all(&work_dir).await?;

    let members = work_dir.join("members.edi");
    tokio::fs::write(
        &members,
        "isa*00*SENDER~ # generated by hand ~gs*HP*01~ NM1*IL*1*DOE*JANE ~SE~",
    )
    .await?;
    let orphan = work_dir.join("orphan.edi");
    tokio::fs::write(&orphan, "GS*HP*02~NM1*IL*1*ROE*RICHARD~").await?;
    let notes = work_dir.join("notes.txt");
    tokio::fs::write(&notes, "not a segment file").await?;

    let executor = PipelineExecutor::builder(SegmentFileAdapter {
        output_dir: work_dir.join("out"),
    })
    .behavior(TrimSegments)
    .behavior(DropComments)
    .behavior(ValidateSegments)
    .behavior(UppercaseIdentifiers)
    .options(PipelineOptions::default().with_setup(true))
    .build();

    let cancel = CancellationToken::new();
    for input in [&members, &orphan, &notes] {
        if !executor.adapter().is_accepted_format(input) {
            println!("Skipping {}", input.display());
            continue;
        }

        let ctx = executor.run(input, &cancel).await;
        println!("\n=== {} ===", input.display());
        println!("Applied: {:?}", ctx.applied_behaviors());
        println!("Success: {}", ctx.is_success());
        if !ctx.warnings("\n").is_empty() {
            println!("Warnings:\n{}", ctx.warnings("\n"));
        }
        if !ctx.is_success() {
            println!("Failures:\n{}", ctx.failures("\n"));
            continue;
        }

        let written = executor.adapter().export(&ctx, &cancel).await?;
        println!("Wrote {}", written.display());
    }

    Ok(())
}
