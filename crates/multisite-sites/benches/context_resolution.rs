//! Benchmarks for site listing and context resolution.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use multisite_content::{ContentRepository, MemoryRepository, NodeRef};
use multisite_sites::{ProviderSettings, RawSiteConfig, SiteDefinitionsProvider};

/// Create `sites` site roots, each with a chain of `depth` pages below it.
fn create_repository(sites: usize, depth: usize) -> MemoryRepository {
    let repository = MemoryRepository::new();
    for i in 0..sites {
        let mut path = format!("/sitecore/content/site-{i}");
        repository.insert("web", &path, Some("Site"));
        for level in 0..depth {
            path.push_str(&format!("/page-{level}"));
            repository.insert("web", &path, None);
        }
    }
    repository.insert("web", "/sitecore/system/settings", None);
    repository
}

fn create_configs(sites: usize) -> Vec<RawSiteConfig> {
    (0..sites)
        .map(|i| {
            RawSiteConfig::new(
                format!("site-{i}"),
                format!("/sitecore/content/site-{i}"),
                "web",
            )
            .with_host_name(format!("site-{i}.test"))
        })
        .collect()
}

fn create_provider(
    sites: usize,
    depth: usize,
    cache_enabled: bool,
) -> (SiteDefinitionsProvider, Arc<MemoryRepository>) {
    let repository = Arc::new(create_repository(sites, depth));
    let settings = ProviderSettings {
        cache_enabled,
        site_template: None,
    };
    let provider = SiteDefinitionsProvider::with_settings(
        create_configs(sites),
        Arc::<MemoryRepository>::clone(&repository),
        &settings,
    );
    (provider, repository)
}

fn deepest_page(repository: &MemoryRepository, site: usize, depth: usize) -> NodeRef {
    let mut path = format!("/sitecore/content/site-{site}");
    for level in 0..depth {
        path.push_str(&format!("/page-{level}"));
    }
    repository.resolve_path("web", &path).unwrap().unwrap()
}

fn bench_site_definitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("site_definitions");

    for sites in [5, 50] {
        let (uncached, _) = create_provider(sites, 3, false);
        let (cached, _) = create_provider(sites, 3, true);

        group.bench_with_input(BenchmarkId::new("uncached", sites), &sites, |b, _| {
            b.iter(|| uncached.site_definitions().unwrap());
        });

        group.bench_with_input(BenchmarkId::new("cached", sites), &sites, |b, _| {
            b.iter(|| cached.site_definitions().unwrap());
        });
    }

    group.finish();
}

fn bench_context_site_definition(c: &mut Criterion) {
    let (provider, repository) = create_provider(20, 8, true);
    let current = provider.site_definition("site-0").unwrap().unwrap();
    let inside_current = deepest_page(&repository, 0, 8);
    let inside_other = deepest_page(&repository, 19, 8);
    let outside = repository
        .resolve_path("web", "/sitecore/system/settings")
        .unwrap()
        .unwrap();

    let mut group = c.benchmark_group("context_site_definition");

    group.bench_function("inside_current", |b| {
        b.iter(|| provider.context_site_definition(&inside_current, &current))
    });

    group.bench_function("inside_other", |b| {
        b.iter(|| provider.context_site_definition(&inside_other, &current))
    });

    group.bench_function("outside", |b| {
        b.iter(|| provider.context_site_definition(&outside, &current))
    });

    group.finish();
}

criterion_group!(benches, bench_site_definitions, bench_context_site_definition);

criterion_main!(benches);
