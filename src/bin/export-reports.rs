/// Write one export file for a school snapshot and print its path.
///
/// Usage: export-reports --school ID [--kind reports|child|staff|parents]
///                       [--format csv|xlsx|pdf] [--out-dir DIR] [filters...]
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use nursery_reports::{
    db::SnapshotStore,
    models::{
        filters::{ReportFilters, SortOrder},
        report::ReportType,
    },
    services::export::{ExportContext, ExportFormat, ExportRequest, ExportService, SectionInclude},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Reports,
    Child,
    Staff,
    Parents,
}

#[derive(Parser)]
#[command(name = "export-reports", about = "Export daily reports, child profiles and rosters")]
struct Args {
    /// School id (directory name under the data dir)
    #[arg(long, env = "SCHOOL")]
    school: String,

    /// Snapshot store root
    #[arg(long, env = "DATA_DIR")]
    data_dir: PathBuf,

    #[arg(long, value_enum, default_value = "reports")]
    kind: Kind,

    /// csv, xlsx or pdf
    #[arg(long, default_value = "csv")]
    format: String,

    /// Where the file is written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    #[arg(long, env = "BRAND_NAME", default_value = "Nursery Reports")]
    brand: String,

    /// Child id, required with --kind child
    #[arg(long)]
    child: Option<String>,

    /// Child export sections to leave out (profile, parents, activitySummary)
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    #[arg(long = "class")]
    class_id: Option<String>,

    /// Single day, YYYY-MM-DD; overrides --from/--to
    #[arg(long)]
    day: Option<String>,

    #[arg(long)]
    from: Option<String>,

    #[arg(long)]
    to: Option<String>,

    /// nappy_change, meal, nap_time, medication or incident
    #[arg(long = "type")]
    report_type: Option<String>,

    #[arg(long)]
    child_search: Option<String>,

    #[arg(long)]
    notes_only: bool,

    /// newest or oldest
    #[arg(long, default_value = "newest")]
    sort: String,

    #[arg(long)]
    limit: Option<usize>,
}

impl Args {
    fn request(&self) -> anyhow::Result<ExportRequest> {
        Ok(match self.kind {
            Kind::Reports => {
                let filters = ReportFilters {
                    class_id: self.class_id.clone(),
                    day: self.day.clone(),
                    date_from: self.from.clone(),
                    date_to: self.to.clone(),
                    report_type: self
                        .report_type
                        .as_deref()
                        .map(str::parse::<ReportType>)
                        .transpose()?,
                    child_search: self.child_search.clone(),
                    has_notes_only: self.notes_only,
                    sort_order: self.sort.parse::<SortOrder>()?,
                    limit: self.limit,
                };
                filters.validate()?;
                ExportRequest::Reports(filters)
            }
            Kind::Child => {
                let child_id = self
                    .child
                    .clone()
                    .ok_or_else(|| anyhow::anyhow!("--child is required with --kind child"))?;
                let include = self
                    .exclude
                    .iter()
                    .fold(SectionInclude::all(), |include, key| include.with(key, false));
                ExportRequest::Child { child_id, include }
            }
            Kind::Staff => ExportRequest::Staff,
            Kind::Parents => ExportRequest::Parents,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let format: ExportFormat = args.format.parse()?;
    let request = args.request()?;

    let store = SnapshotStore::new(&args.data_dir);
    let ctx = ExportContext::today(args.brand.clone());

    tracing::info!("Exporting {} for school {}", request.kind(), args.school);
    let file = ExportService::export(&store, &args.school, &ctx, &request, format).await?;

    tokio::fs::create_dir_all(&args.out_dir).await?;
    let path = args.out_dir.join(&file.filename);
    tokio::fs::write(&path, &file.bytes).await?;

    println!("{}", path.display());
    Ok(())
}
