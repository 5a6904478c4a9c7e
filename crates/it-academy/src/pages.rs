//! Server-rendered HTML for the academy landing page, track catalog, activities
//! gallery, and registration wizard.

use std::fmt::Write as _;

use crate::activities::{Gallery, TournamentPage, AUTO_ADVANCE_INTERVAL};
use crate::catalog::{CatalogTab, TabContent, TrackCatalog, COURSE_TRACKS};
use crate::registration::{
    CourseInterest, EducationLevel, ExperienceLevel, FieldName, ReferralSource, WizardView,
    FORM_STEPS,
};

pub const LANDING_PATH: &str = "/itacademy";
pub const REGISTER_PATH: &str = "/register";

fn open_document(html: &mut String, title: &str, refresh: Option<(u64, &str)>) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(html, "<title>{}</title>", escape_html(title)).expect("document title");
    if let Some((secs, target)) = refresh {
        writeln!(
            html,
            "<meta http-equiv=\"refresh\" content=\"{}; url={}\">",
            secs,
            escape_html(target)
        )
        .expect("refresh meta");
    }
    html.push_str("</head>\n<body>\n");
}

fn close_document(html: &mut String) {
    html.push_str("</body>\n</html>\n");
}

pub fn render_landing() -> String {
    let mut html = String::new();
    open_document(&mut html, "IT Academy", None);
    html.push_str("<h1>IT Academy</h1>\n<h2>Our Courses</h2>\n<ul>\n");
    for track in COURSE_TRACKS {
        if track == "Cybersecurity" {
            writeln!(
                html,
                "<li><a href=\"{LANDING_PATH}/cybersecurity\">{}</a></li>",
                escape_html(track)
            )
            .expect("track link");
        } else {
            writeln!(html, "<li>{}</li>", escape_html(track)).expect("track item");
        }
    }
    html.push_str("</ul>\n");
    writeln!(html, "<p><a href=\"{REGISTER_PATH}\">Register now</a></p>").expect("register link");
    html.push_str("<p><a href=\"/activities\">Recent activities</a></p>\n");
    close_document(&mut html);
    html
}

pub fn render_track(catalog: &TrackCatalog, tab: CatalogTab) -> String {
    let mut html = String::new();
    let overview = &catalog.overview;
    open_document(&mut html, overview.title, None);
    writeln!(html, "<h1>{}</h1>", escape_html(overview.title)).expect("track heading");
    writeln!(html, "<p>{}</p>", escape_html(catalog.tagline)).expect("tagline");

    html.push_str("<nav>\n");
    for candidate in CatalogTab::ALL {
        if candidate == tab {
            writeln!(html, "<strong>{}</strong>", candidate.label()).expect("active tab");
        } else {
            writeln!(
                html,
                "<a href=\"{LANDING_PATH}/cybersecurity?tab={}\">{}</a>",
                candidate.as_str(),
                candidate.label()
            )
            .expect("tab link");
        }
    }
    html.push_str("</nav>\n");

    let view = catalog.tab_view(tab);
    writeln!(html, "<section>\n<h2>{}</h2>", escape_html(view.title)).expect("tab heading");
    match &view.content {
        TabContent::Overview(overview) => {
            writeln!(
                html,
                "<img src=\"{}\" alt=\"{} Overview\">",
                escape_html(overview.image),
                escape_html(overview.title)
            )
            .expect("overview image");
            writeln!(html, "<p>{}</p>", escape_html(overview.description)).expect("description");
            writeln!(
                html,
                "<p><strong>Duration:</strong> {}</p>\n<p><strong>Level:</strong> {}</p>",
                escape_html(overview.duration),
                escape_html(overview.level)
            )
            .expect("overview facts");
        }
        TabContent::Grid { items } => {
            html.push_str("<ul>\n");
            for item in items {
                let name = escape_html(item.name);
                writeln!(
                    html,
                    "<li><img src=\"{}\" alt=\"{}\"><h3>{}</h3></li>",
                    escape_html(item.image),
                    name,
                    name
                )
                .expect("grid item");
            }
            html.push_str("</ul>\n");
        }
    }
    html.push_str("</section>\n");

    html.push_str("<h2>Core Security Concepts</h2>\n<ul>\n");
    for concept in &catalog.core_concepts {
        writeln!(
            html,
            "<li><h3>{}</h3><p>{}</p></li>",
            escape_html(concept.name),
            escape_html(concept.description)
        )
        .expect("concept");
    }
    html.push_str("</ul>\n<h2>Security Assessment Process</h2>\n<ol>\n");
    for phase in &catalog.assessment_process {
        writeln!(html, "<li>{}</li>", escape_html(phase)).expect("phase");
    }
    html.push_str("</ol>\n");
    writeln!(html, "<footer><p>{}</p></footer>", escape_html(catalog.motto)).expect("footer");
    close_document(&mut html);
    html
}

/// Gallery page. The refresh header moves to the next photo after
/// [`AUTO_ADVANCE_INTERVAL`].
pub fn render_activities(page: &TournamentPage, gallery: &Gallery) -> String {
    let mut html = String::new();
    let next_link = format!("/activities?image={}", gallery.next_index());
    open_document(
        &mut html,
        page.title,
        Some((AUTO_ADVANCE_INTERVAL.as_secs(), next_link.as_str())),
    );
    html.push_str("<p><a href=\"/\">Back to Home</a></p>\n");
    writeln!(html, "<h1>{}</h1>", escape_html(page.title)).expect("tournament heading");
    writeln!(html, "<p>{}</p>", escape_html(page.description)).expect("tournament description");
    writeln!(
        html,
        "<ul><li>{}</li><li>{}</li><li>{}</li></ul>",
        escape_html(page.date),
        escape_html(page.location),
        escape_html(page.participants)
    )
    .expect("tournament facts");

    html.push_str("<h2>Tournament Highlights</h2>\n");
    if let Some(image) = page.images.get(gallery.active_index()) {
        writeln!(
            html,
            "<figure><img src=\"{}\" alt=\"{}\"><figcaption>{}<br>Image {} of {}</figcaption></figure>",
            escape_html(image.src),
            escape_html(image.alt),
            escape_html(image.caption),
            gallery.active_index() + 1,
            gallery.len()
        )
        .expect("active image");
    }
    writeln!(
        html,
        "<p><a rel=\"prev\" href=\"/activities?image={}\">Previous</a> <a rel=\"next\" href=\"{}\">Next</a></p>",
        gallery.prev_index(),
        next_link
    )
    .expect("gallery navigation");

    html.push_str("<h2>Tournament Success</h2>\n<h3>Event Highlights</h3>\n<ul>\n");
    for highlight in &page.highlights {
        writeln!(html, "<li>{}</li>", escape_html(highlight)).expect("highlight");
    }
    html.push_str("</ul>\n<h3>What's Next?</h3>\n");
    for paragraph in &page.whats_next {
        writeln!(html, "<p>{}</p>", escape_html(paragraph)).expect("next paragraph");
    }
    writeln!(
        html,
        "<h2>More Exciting Events Coming Soon!</h2>\n<p>{}</p>",
        escape_html(page.upcoming)
    )
    .expect("upcoming");
    close_document(&mut html);
    html
}

/// Blank wizard shell listing every step and its fields.
pub fn render_registration_overview() -> String {
    let mut html = String::new();
    open_document(&mut html, "IT Academy Registration", None);
    html.push_str("<h1>IT Academy Registration</h1>\n<ol>\n");
    for step in &FORM_STEPS {
        writeln!(html, "<li><h2>{}</h2><ul>", escape_html(step.label)).expect("step heading");
        for field in step.fields {
            writeln!(html, "<li>{}</li>", escape_html(field.label())).expect("field label");
        }
        html.push_str("</ul></li>\n");
    }
    html.push_str("</ol>\n");
    writeln!(
        html,
        "<form method=\"post\" action=\"{REGISTER_PATH}\"><button type=\"submit\">Start registration</button></form>"
    )
    .expect("start form");
    close_document(&mut html);
    html
}

/// One wizard session: progress, the current step's fields with their errors,
/// or the completion notice once submitted.
pub fn render_wizard(view: &WizardView) -> String {
    let mut html = String::new();
    let refresh = view
        .redirect
        .as_ref()
        .map(|redirect| (redirect.after.as_secs(), redirect.to.as_str()));
    open_document(&mut html, "IT Academy Registration", refresh);
    html.push_str("<h1>IT Academy Registration</h1>\n");

    if view.succeeded {
        html.push_str("<section class=\"success\">\n<h2>Registration Successful!</h2>\n");
        writeln!(
            html,
            "<p>Thank you, {}. We have received your registration.</p>",
            escape_html(&view.draft.full_name)
        )
        .expect("success message");
        if let Some(redirect) = &view.redirect {
            writeln!(
                html,
                "<p>Redirecting to <a href=\"{0}\">{0}</a> in {1} seconds.</p>",
                escape_html(&redirect.to),
                redirect.after.as_secs()
            )
            .expect("redirect notice");
        }
        html.push_str("</section>\n");
        close_document(&mut html);
        return html;
    }

    html.push_str("<ol class=\"progress\">\n");
    for (index, label) in view.steps.iter().enumerate() {
        let marker = if index < view.current_step {
            "done"
        } else if index == view.current_step {
            "current"
        } else {
            "pending"
        };
        writeln!(html, "<li class=\"{marker}\">{}</li>", escape_html(label)).expect("progress");
    }
    html.push_str("</ol>\n");

    writeln!(
        html,
        "<h2>Step {} of {}: {}</h2>",
        view.current_step + 1,
        view.steps.len(),
        escape_html(view.step_label)
    )
    .expect("step heading");

    if let Some(step) = FORM_STEPS.get(view.current_step) {
        html.push_str("<dl>\n");
        for field in step.fields {
            let value = view.draft.display_value(*field);
            writeln!(
                html,
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(field.label()),
                escape_html(&value)
            )
            .expect("field value");
            if let Some(options) = field_options(*field) {
                writeln!(html, "<dd>Options: {}</dd>", escape_html(&options.join(", ")))
                    .expect("field options");
            }
            if let Some(message) = view.errors.get(*field) {
                writeln!(html, "<dd class=\"error\">{}</dd>", escape_html(message))
                    .expect("field error");
            }
        }
        html.push_str("</dl>\n");
    }

    if view.submitting {
        html.push_str("<p>Submitting...</p>\n");
    }
    close_document(&mut html);
    html
}

fn field_options(field: FieldName) -> Option<Vec<&'static str>> {
    let labels: Vec<&'static str> = match field {
        FieldName::CourseInterest => CourseInterest::ALL.iter().map(|o| o.label()).collect(),
        FieldName::ExperienceLevel => ExperienceLevel::ALL.iter().map(|o| o.label()).collect(),
        FieldName::EducationLevel => EducationLevel::ALL.iter().map(|o| o.label()).collect(),
        FieldName::HearAboutUs => ReferralSource::ALL.iter().map(|o| o.label()).collect(),
        _ => return None,
    };
    Some(labels)
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
