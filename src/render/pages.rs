//! Page body markup.
//!
//! Presentational only: semantic sections fed from the loaded content.
//! Anything SEO-relevant goes through the head synchronizer, never here.

use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::seo::routes::{Route, RouteKind, url_path};
use crate::utils::xml::{
    XmlWriter, write_empty_elem, write_end, write_start, write_text_element,
    write_text_element_with,
};
use anyhow::Result;

/// Site header with the main navigation.
pub fn write_header(
    writer: &mut XmlWriter,
    config: &SiteConfig,
    _content: &SiteContent,
) -> Result<()> {
    write_start(writer, "header", &[])?;
    write_text_element_with(
        writer,
        "a",
        &[("class", "brand"), ("href", &url_path(config, "/"))],
        &config.base.title,
    )?;

    write_start(writer, "nav", &[("aria-label", "principale")])?;
    write_start(writer, "ul", &[])?;
    for (label, path) in [
        ("Accueil", "/"),
        ("À propos", "/about/"),
        ("Services", "/services/"),
        ("Portfolio", "/portfolio/"),
        ("Contact", "/contact/"),
    ] {
        write_start(writer, "li", &[])?;
        write_text_element_with(writer, "a", &[("href", &url_path(config, path))], label)?;
        write_end(writer, "li")?;
    }
    write_end(writer, "ul")?;
    write_end(writer, "nav")?;
    write_end(writer, "header")?;
    Ok(())
}

/// Dispatch to the body writer of one route.
pub fn write_body(
    writer: &mut XmlWriter,
    route: &Route,
    config: &SiteConfig,
    content: &SiteContent,
) -> Result<()> {
    match route.kind {
        RouteKind::Home => write_home(writer, config, content),
        RouteKind::About => write_about(writer, content),
        RouteKind::Services => write_services(writer, config, content),
        RouteKind::ServiceDetail(index) => match content.services.get(index) {
            Some(service) => write_service_detail(writer, service),
            None => Ok(()),
        },
        RouteKind::Portfolio => write_portfolio(writer, content),
        RouteKind::Contact => write_contact(writer, content),
        RouteKind::Legal(index) => match content.legal.get(index) {
            Some(page) => write_legal(writer, page),
            None => Ok(()),
        },
    }
}

fn write_home(writer: &mut XmlWriter, config: &SiteConfig, content: &SiteContent) -> Result<()> {
    write_start(writer, "section", &[("class", "hero")])?;
    write_text_element(writer, "h1", &config.base.title)?;
    write_text_element(writer, "p", &config.base.description)?;
    write_text_element_with(
        writer,
        "a",
        &[("class", "cta"), ("href", &url_path(config, "/contact/"))],
        "Parlons de votre projet",
    )?;
    write_end(writer, "section")?;

    if !content.services.is_empty() {
        write_start(writer, "section", &[("class", "services-overview")])?;
        write_text_element(writer, "h2", "Nos services")?;
        write_start(writer, "ul", &[])?;
        for service in &content.services {
            let href = url_path(config, &format!("/services/{}/", service.slug));
            write_start(writer, "li", &[])?;
            write_text_element_with(writer, "a", &[("href", &href)], &service.title)?;
            write_text_element(writer, "p", &service.description)?;
            write_end(writer, "li")?;
        }
        write_end(writer, "ul")?;
        write_end(writer, "section")?;
    }
    Ok(())
}

fn write_about(writer: &mut XmlWriter, content: &SiteContent) -> Result<()> {
    write_start(writer, "section", &[("class", "team")])?;
    write_text_element(writer, "h1", "À propos")?;

    for member in &content.team {
        write_start(writer, "article", &[("class", "member")])?;
        write_text_element(writer, "h2", &member.name)?;
        write_text_element(writer, "h3", &member.role)?;
        if !member.bio.is_empty() {
            write_text_element(writer, "p", &member.bio)?;
        }
        if let Some(linkedin) = &member.social.linkedin {
            write_text_element_with(writer, "a", &[("href", linkedin)], "LinkedIn")?;
        }
        write_end(writer, "article")?;
    }
    write_end(writer, "section")?;
    Ok(())
}

fn write_services(
    writer: &mut XmlWriter,
    config: &SiteConfig,
    content: &SiteContent,
) -> Result<()> {
    write_start(writer, "section", &[("class", "services")])?;
    write_text_element(writer, "h1", "Services")?;

    for service in &content.services {
        let href = url_path(config, &format!("/services/{}/", service.slug));
        write_start(writer, "article", &[("class", "service-card")])?;
        write_text_element_with(writer, "a", &[("href", &href)], &service.title)?;
        write_text_element(writer, "p", &service.description)?;
        write_end(writer, "article")?;
    }
    write_end(writer, "section")?;
    Ok(())
}

fn write_service_detail(writer: &mut XmlWriter, service: &crate::content::Service) -> Result<()> {
    write_start(writer, "section", &[("class", "service-detail")])?;
    write_text_element(writer, "h1", &service.title)?;
    write_text_element(writer, "p", &service.description)?;

    if !service.features.is_empty() {
        write_text_element(writer, "h2", "Prestations")?;
        write_start(writer, "ul", &[("class", "features")])?;
        for feature in &service.features {
            write_text_element(writer, "li", feature)?;
        }
        write_end(writer, "ul")?;
    }
    write_end(writer, "section")?;
    Ok(())
}

fn write_portfolio(writer: &mut XmlWriter, content: &SiteContent) -> Result<()> {
    write_start(writer, "section", &[("class", "portfolio")])?;
    write_text_element(writer, "h1", "Portfolio")?;

    for project in &content.projects {
        write_start(writer, "article", &[("class", "project")])?;
        write_text_element(writer, "h2", &project.title)?;
        if !project.category.is_empty() {
            write_text_element_with(
                writer,
                "span",
                &[("class", "category")],
                &project.category,
            )?;
        }
        write_text_element(writer, "p", &project.description)?;
        if let Some(client) = &project.client {
            write_text_element_with(writer, "p", &[("class", "client")], client)?;
        }
        write_end(writer, "article")?;
    }
    write_end(writer, "section")?;
    Ok(())
}

fn write_contact(writer: &mut XmlWriter, content: &SiteContent) -> Result<()> {
    write_start(writer, "section", &[("class", "contact")])?;
    write_text_element(writer, "h1", "Contact")?;

    if !content.contact.email.is_empty() {
        write_text_element_with(
            writer,
            "a",
            &[("href", &format!("mailto:{}", content.contact.email))],
            &content.contact.email,
        )?;
    }
    if !content.contact.phone.is_empty() {
        write_text_element(writer, "p", &content.contact.phone)?;
    }
    if !content.contact.address.is_empty() {
        write_text_element(writer, "address", &content.contact.address)?;
    }

    // Submission is simulated client-side; the form posts nowhere.
    write_start(writer, "form", &[("class", "contact-form")])?;
    for (name, kind) in [("name", "text"), ("email", "email"), ("phone", "tel")] {
        write_empty_elem(writer, "input", &[("type", kind), ("name", name)])?;
    }
    write_start(writer, "select", &[("name", "service")])?;
    for service in &content.services {
        write_text_element_with(
            writer,
            "option",
            &[("value", &service.slug)],
            &service.title,
        )?;
    }
    write_end(writer, "select")?;
    write_text_element_with(writer, "textarea", &[("name", "message")], " ")?;
    write_text_element_with(writer, "button", &[("type", "submit")], "Envoyer")?;
    write_end(writer, "form")?;
    write_end(writer, "section")?;
    Ok(())
}

fn write_legal(writer: &mut XmlWriter, page: &crate::content::LegalPage) -> Result<()> {
    write_start(writer, "section", &[("class", "legal")])?;
    write_text_element(writer, "h1", &page.title)?;

    for section in &page.sections {
        write_text_element(writer, "h2", &section.heading)?;
        write_text_element(writer, "p", &section.text)?;
    }
    write_end(writer, "section")?;
    Ok(())
}
