use crate::infra::{directory_service, InMemoryOrganizationRepository};
use clap::Args;
use partner_align::config::AppConfig;
use partner_align::directory::{
    DirectoryService, FundingType, OrganizationId, RecommendationPage, RecommendationRequest,
    SearchQuery, SearchResults, SortBy, VerificationStatus,
};
use partner_align::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Directory CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// First organization id
    pub(crate) org_a: String,
    /// Second organization id
    pub(crate) org_b: String,
}

#[derive(Args, Debug)]
pub(crate) struct SearchArgs {
    /// Directory CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Free-text match on name, mission, description and focus areas
    #[arg(long)]
    pub(crate) q: Option<String>,
    /// Exact focus area
    #[arg(long)]
    pub(crate) focus_area: Option<String>,
    /// Region substring
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// grant, provider, recipient or mixed
    #[arg(long)]
    pub(crate) funding_type: Option<FundingType>,
    /// verified, unverified or pending
    #[arg(long)]
    pub(crate) verification_status: Option<VerificationStatus>,
    /// alignment (default), name, recency or confidence
    #[arg(long)]
    pub(crate) sort_by: Option<SortBy>,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Directory CSV export
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Organization to find partners for
    pub(crate) org_id: String,
    /// Page size
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Number of recommendations to skip
    #[arg(long)]
    pub(crate) offset: Option<usize>,
}

fn load_directory(
    csv: &Path,
) -> Result<Arc<DirectoryService<InMemoryOrganizationRepository>>, AppError> {
    let config = AppConfig::load()?;
    directory_service(&config.directory, Some(csv))
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let service = load_directory(&args.csv)?;
    let a = service.get(&OrganizationId(args.org_a))?;
    let b = service.get(&OrganizationId(args.org_b))?;
    let result = service.engine().pairwise(&a, &b);

    println!("Alignment: {} <> {}", a.name, b.name);
    println!("- score {} / 100", result.score);
    println!("- reason: {}", result.reason);
    for component in &result.components {
        println!("  - {:?}: {:+}", component.factor, component.points);
    }
    Ok(())
}

pub(crate) fn run_search(args: SearchArgs) -> Result<(), AppError> {
    let SearchArgs {
        csv,
        q,
        focus_area,
        region,
        funding_type,
        verification_status,
        sort_by,
    } = args;

    let service = load_directory(&csv)?;
    let query = SearchQuery {
        q: q.filter(|value| !value.trim().is_empty()),
        focus_area: focus_area.filter(|value| !value.trim().is_empty()),
        region: region.filter(|value| !value.trim().is_empty()),
        funding_type,
        verification_status,
        sort_by,
    };
    let results = service.search(&query)?;
    render_search(&results);
    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let service = load_directory(&args.csv)?;
    let page = service.recommend(RecommendationRequest {
        org_id: args.org_id,
        limit: args.limit,
        offset: args.offset,
    })?;
    render_recommendations(&page);
    Ok(())
}

fn render_search(results: &SearchResults) {
    println!("{} matching organization(s)", results.total);
    for entry in &results.results {
        let organization = &entry.organization;
        println!(
            "- [{:>3}] {} ({}) | {} | confidence {}",
            entry.alignment_score,
            organization.name,
            organization
                .organization_type
                .map(|kind| kind.label())
                .unwrap_or("unknown type"),
            if organization.has_region() {
                organization.region.as_str()
            } else {
                "no region"
            },
            organization.confidence(),
        );
    }
    println!("Focus areas: {}", results.focus_areas.join(", "));
    println!("Regions: {}", results.regions.join(", "));
}

fn render_recommendations(page: &RecommendationPage) {
    println!(
        "Recommended partners for {} (showing {} of {}, offset {})",
        page.org_id,
        page.results.len(),
        page.total,
        page.offset
    );
    for entry in &page.results {
        println!(
            "- [{:>3}] {} ({}): {}",
            entry.alignment_score, entry.organization.name, entry.organization.id, entry.match_reason
        );
    }
}
