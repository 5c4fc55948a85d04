use anyhow::{Context, Result};
use backend::{
    api::search::SolrTransport,
    clock::{Clock, SystemClock},
    config::SearchConfig,
    session::SearchSession,
};
use clap::Parser;
use common::{
    criteria::TextOperator,
    facet_selection::FacetSelection,
    field_registry::FieldRegistry,
    filter_form::FilterForm,
    search_query::SearchQuery,
    session_snapshot::SessionSnapshot,
};
use indexmap::IndexMap;

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Compile a document search and run it against the Solr core")]
struct Cli {
    /// Free text search
    #[arg(long, default_value = "")]
    query: String,

    /// Text filter, as LABEL=VALUE (matched with "contains")
    #[arg(long = "text", value_parser = parse_pair)]
    texts: Vec<(String, String)>,

    /// Facet selection, as FIELD=VALUE
    #[arg(long = "facet", value_parser = parse_pair)]
    facets: Vec<(String, String)>,

    /// Result page, starting at 1
    #[arg(long, default_value_t = 1)]
    page: u64,

    /// Saved search state, as printed by a previous run; replaces --query, --facet and --page
    #[arg(long)]
    state: Option<String>,

    /// Print the compiled query and exit without contacting the engine
    #[arg(long)]
    print_query: bool,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn snapshot_from_cli(cli: &Cli) -> Result<SessionSnapshot> {
    if let Some(state) = &cli.state {
        return SessionSnapshot::from_token(state).context("invalid --state");
    }
    let mut facets: IndexMap<String, Vec<String>> = IndexMap::new();
    for (field, value) in &cli.facets {
        facets.entry(field.clone()).or_default().push(value.clone());
    }
    Ok(SessionSnapshot { free_text: cli.query.clone(), facets, page: cli.page })
}

fn fill_form(form: &mut FilterForm, cli: &Cli) {
    for (label, value) in &cli.texts {
        form.set_text(label, value.clone(), TextOperator::Contains);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = SearchConfig::from_env();
    let registry = FieldRegistry::default();
    let snapshot = snapshot_from_cli(&cli)?;

    if cli.print_query {
        let mut form = FilterForm::from_registry(&registry);
        fill_form(&mut form, &cli);
        let query = SearchQuery {
            query_string: snapshot.free_text,
            filters: form.collect(&registry, SystemClock.today()).into_iter().collect(),
            facet_filters: FacetSelection::from(snapshot.facets),
        };
        println!("{}", query.compile());
        return Ok(());
    }

    let transport = SolrTransport::new(config.clone(), registry.clone())?;
    let mut session = SearchSession::with_registry(transport, SystemClock, &config, registry);
    fill_form(session.form_mut(), &cli);
    session.restore_with_form(snapshot).await;

    println!("query: {}", session.compiled_query());
    for filter in session.applied_filters() {
        match filter.operator_label() {
            Some(operator) => println!("filter: {} {} {}", filter.label, operator, filter.display_value),
            None => println!("filter: {} {}", filter.label, filter.display_value),
        }
    }
    let page = session.page_state();
    println!("total: {} (page {} of {})", page.total_results, page.current_page, page.total_pages());
    for document in &session.last_response().documents {
        let processo = document.field("Número do processo").unwrap_or("-");
        println!("{:>3}. {} [{}] {}", page.start_offset() + document.result_index_in_page + 1, document.title, processo, document.pdf_url);
    }
    for group in session.facet_groups() {
        let items = group.items.iter().map(|item| format!("{} ({})", item.label, item.count)).collect::<Vec<_>>();
        println!("{}: {}", group.label, items.join(", "));
    }
    println!("state: {}", session.snapshot().to_token());
    Ok(())
}
