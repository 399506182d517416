//! Route table and per-route SEO factories.
//!
//! Every page of the site has a fixed route; its `SeoData` is assembled
//! here from the site config and the loaded content. The factories own
//! the title composition ("{page} - {site}"), the canonical URLs and the
//! JSON-LD blocks; the head synchronizer never sees where a value came
//! from.

use super::{OpenGraphData, SeoData, TwitterData};
use crate::config::SiteConfig;
use crate::content::SiteContent;
use serde_json::{Value, json};

/// Which page a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Home,
    About,
    Services,
    /// Index into `SiteContent::services`.
    ServiceDetail(usize),
    Portfolio,
    Contact,
    /// Index into `SiteContent::legal`.
    Legal(usize),
}

/// One addressable page of the site.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub kind: RouteKind,
    /// URL path relative to the site root, with a trailing slash
    /// (`/`, `/about/`, `/services/diffusion/`).
    pub path: String,
    /// Human label for navigation and logging.
    pub label: String,
}

/// The full route table for the loaded content.
pub fn routes(content: &SiteContent) -> Vec<Route> {
    let mut routes = vec![
        Route {
            kind: RouteKind::Home,
            path: "/".into(),
            label: "Accueil".into(),
        },
        Route {
            kind: RouteKind::About,
            path: "/about/".into(),
            label: "À propos".into(),
        },
        Route {
            kind: RouteKind::Services,
            path: "/services/".into(),
            label: "Services".into(),
        },
    ];

    for (index, service) in content.services.iter().enumerate() {
        routes.push(Route {
            kind: RouteKind::ServiceDetail(index),
            path: format!("/services/{}/", service.slug),
            label: service.title.clone(),
        });
    }

    routes.push(Route {
        kind: RouteKind::Portfolio,
        path: "/portfolio/".into(),
        label: "Portfolio".into(),
    });
    routes.push(Route {
        kind: RouteKind::Contact,
        path: "/contact/".into(),
        label: "Contact".into(),
    });

    for (index, page) in content.legal.iter().enumerate() {
        routes.push(Route {
            kind: RouteKind::Legal(index),
            path: format!("/{}/", page.slug),
            label: page.title.clone(),
        });
    }

    routes
}

/// URL path including the configured path prefix.
pub fn url_path(config: &SiteConfig, route_path: &str) -> String {
    let prefix = config.build.path_prefix.to_string_lossy();
    if prefix.is_empty() {
        route_path.to_owned()
    } else {
        format!("/{}{route_path}", prefix.trim_matches('/'))
    }
}

/// Absolute URL for a route, when a base URL is configured.
pub fn full_url(config: &SiteConfig, route_path: &str) -> Option<String> {
    config
        .base
        .url_trimmed()
        .map(|base| format!("{base}{}", url_path(config, route_path)))
}

/// Assemble the SEO description for one route.
pub fn seo_for(route: &Route, config: &SiteConfig, content: &SiteContent) -> SeoData {
    match route.kind {
        RouteKind::Home => home_seo(config, content),
        RouteKind::ServiceDetail(index) => content
            .services
            .get(index)
            .map(|service| service_seo(route, service, config))
            .unwrap_or_default(),
        RouteKind::Legal(index) => content
            .legal
            .get(index)
            .map(|page| page_seo(route, &page.description, config))
            .unwrap_or_default(),
        RouteKind::About => page_seo(
            route,
            &format!(
                "Découvrez l'équipe et les valeurs de {}.",
                site_name(config)
            ),
            config,
        ),
        RouteKind::Services => page_seo(
            route,
            &format!("Les services proposés par {}.", site_name(config)),
            config,
        ),
        RouteKind::Portfolio => page_seo(
            route,
            &format!("Les réalisations de {}.", site_name(config)),
            config,
        ),
        RouteKind::Contact => {
            let mut seo = page_seo(
                route,
                &format!("Contactez {} pour votre projet.", site_name(config)),
                config,
            );
            seo.keywords.push("contact".into());
            seo
        }
    }
}

fn site_name(config: &SiteConfig) -> &str {
    config.seo.site_name_or(&config.base.title)
}

fn twitter_site(config: &SiteConfig) -> Option<String> {
    (!config.seo.twitter_site.is_empty()).then(|| config.seo.twitter_site.clone())
}

fn site_image(config: &SiteConfig) -> Option<String> {
    (!config.seo.image.is_empty()).then(|| config.seo.image.clone())
}

/// Home page: full brand title, site keywords, Organization JSON-LD.
fn home_seo(config: &SiteConfig, content: &SiteContent) -> SeoData {
    let canonical = full_url(config, "/");

    SeoData {
        title: Some(format!(
            "{} - {}",
            config.base.title, config.base.description
        )),
        description: Some(config.base.description.clone()),
        keywords: config.seo.keywords.clone(),
        canonical: canonical.clone(),
        open_graph: Some(OpenGraphData {
            title: Some(config.base.title.clone()),
            description: Some(config.base.description.clone()),
            url: canonical,
            kind: Some("website".into()),
            image: site_image(config),
            image_alt: None,
            site_name: Some(site_name(config).to_owned()),
            locale: Some(config.seo.locale.clone()),
        }),
        twitter: Some(TwitterData {
            card: Some(config.seo.twitter_card.clone()),
            image: site_image(config),
            site: twitter_site(config),
            ..Default::default()
        }),
        structured_data: Some(organization_block(config, content)),
    }
}

/// Service detail page: service description, Service JSON-LD.
fn service_seo(
    route: &Route,
    service: &crate::content::Service,
    config: &SiteConfig,
) -> SeoData {
    let canonical = full_url(config, &route.path);
    let mut keywords = config.seo.keywords.clone();
    keywords.push(service.title.to_lowercase());

    SeoData {
        title: Some(format!("{} - {}", service.title, site_name(config))),
        description: Some(service.description.clone()),
        keywords,
        canonical: canonical.clone(),
        open_graph: Some(OpenGraphData {
            url: canonical.clone(),
            kind: Some("article".into()),
            image: service.image.clone().or_else(|| site_image(config)),
            site_name: Some(site_name(config).to_owned()),
            locale: Some(config.seo.locale.clone()),
            ..Default::default()
        }),
        twitter: Some(TwitterData {
            card: Some("summary".into()),
            image: service.image.clone(),
            site: twitter_site(config),
            ..Default::default()
        }),
        structured_data: Some(service_block(service, &canonical, config)),
    }
}

/// schema.org Service block for one detail page.
fn service_block(
    service: &crate::content::Service,
    canonical: &Option<String>,
    config: &SiteConfig,
) -> Value {
    let mut provider = serde_json::Map::new();
    provider.insert("@type".into(), json!("Organization"));
    provider.insert("name".into(), json!(site_name(config)));
    if let Some(url) = config.base.url_trimmed() {
        provider.insert("url".into(), json!(url));
    }

    let mut block = serde_json::Map::new();
    block.insert("@context".into(), json!("https://schema.org"));
    block.insert("@type".into(), json!("Service"));
    block.insert("name".into(), json!(service.title));
    block.insert("description".into(), json!(service.description));
    block.insert("serviceType".into(), json!(service.title));
    block.insert("provider".into(), Value::Object(provider));
    if let Some(canonical) = canonical {
        block.insert("url".into(), json!(canonical));
    }

    Value::Object(block)
}

/// Generic inner page: composed title, no structured data.
fn page_seo(route: &Route, description: &str, config: &SiteConfig) -> SeoData {
    let canonical = full_url(config, &route.path);

    SeoData {
        title: Some(format!("{} - {}", route.label, site_name(config))),
        description: Some(description.to_owned()),
        keywords: Vec::new(),
        canonical: canonical.clone(),
        open_graph: Some(OpenGraphData {
            url: canonical,
            kind: Some("article".into()),
            site_name: Some(site_name(config).to_owned()),
            locale: Some(config.seo.locale.clone()),
            ..Default::default()
        }),
        twitter: Some(TwitterData {
            card: Some("summary".into()),
            site: twitter_site(config),
            ..Default::default()
        }),
        structured_data: None,
    }
}

/// schema.org Organization block for the home page.
fn organization_block(config: &SiteConfig, content: &SiteContent) -> Value {
    let org = &config.seo.organization;
    let mut obj = serde_json::Map::new();
    obj.insert("@context".into(), json!("https://schema.org"));
    obj.insert("@type".into(), json!("Organization"));
    obj.insert("name".into(), json!(site_name(config)));
    obj.insert("description".into(), json!(config.base.description));

    if let Some(url) = config.base.url_trimmed() {
        obj.insert("url".into(), json!(url));
    }
    if !org.logo.is_empty() {
        obj.insert("logo".into(), json!(org.logo));
    }

    let phone = if org.phone.is_empty() {
        &content.contact.phone
    } else {
        &org.phone
    };
    if !phone.is_empty() {
        obj.insert(
            "contactPoint".into(),
            json!({
                "@type": "ContactPoint",
                "telephone": phone,
                "contactType": org.contact_type,
            }),
        );
    }
    if !org.same_as.is_empty() {
        obj.insert("sameAs".into(), json!(org.same_as));
    }
    if !org.locality.is_empty() || !org.country.is_empty() {
        obj.insert(
            "address".into(),
            json!({
                "@type": "PostalAddress",
                "addressLocality": org.locality,
                "addressCountry": org.country,
            }),
        );
    }

    Value::Object(obj)
}
