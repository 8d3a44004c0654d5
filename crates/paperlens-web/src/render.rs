//! Server-side HTML for the three views.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use paperlens_core::{ComparisonRecord, PaperRecord, PaperStatus, Session};

/// Which nav entry is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Library,
    Upload,
    Compare,
}

/// Feedback banner shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Info(String),
    Success(String),
    Warning(String),
}

/// An upload batch the page should follow live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUpload {
    pub job: u64,
    pub total: usize,
}

/// Follows `/upload/events/{job}`: moves the bar after each file and shows
/// the summary once the batch completes.
const PROGRESS_SCRIPT: &str = "<script>\
(function(){\
var bar=document.getElementById('upload-progress'),label=document.getElementById('upload-count'),\
log=document.getElementById('upload-log'),status=document.getElementById('upload-status');\
var es=new EventSource('/upload/events/'+bar.dataset.job);\
es.addEventListener('progress',function(e){var d=JSON.parse(e.data);bar.value=d.done;\
label.textContent=d.done+'/'+d.total;var li=document.createElement('li');li.textContent=d.line;\
log.appendChild(li);});\
es.addEventListener('complete',function(e){var d=JSON.parse(e.data);status.textContent=d.message;\
status.className='banner success';es.close();});\
es.onerror=function(){es.close();};\
})();</script>";

const STYLE: &str = "\
body{margin:0;font-family:sans-serif;min-height:100vh;display:flex;\
background:linear-gradient(135deg,#667eea 0%,#764ba2 100%)}\
nav{width:13rem;background:#fff;padding:1rem}\
nav a{display:block;padding:.4rem;color:#333;text-decoration:none}\
nav a.active{font-weight:bold;color:#764ba2}\
main{flex:1;margin:1rem;background:#fff;border-radius:8px;padding:1.5rem}\
.banner{padding:.6rem;border-radius:4px;margin-bottom:1rem}\
.info{background:#e8f0fe}.success{background:#e6f4ea}.warning{background:#fef7e0}\
.metrics{display:flex;gap:2rem}.metric b{font-size:1.6rem;display:block}\
.badge{background:#eee;border-radius:8px;padding:0 .5rem}\
.theme{display:inline-block;background:#e8f0fe;padding:.4rem .8rem;margin:.2rem;border-radius:4px}\
details{border:1px solid #ddd;border-radius:4px;margin:.5rem 0;padding:.5rem}";

fn layout(page: Page, title: &str, banner: Option<&Banner>, body: &str) -> String {
    let link = |p: Page, href: &str, label: &str| {
        let class = if p == page { " class=\"active\"" } else { "" };
        format!("<a href=\"{href}\"{class}>{label}</a>")
    };
    let banner_html = banner.map(render_banner).unwrap_or_default();
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title} - PaperLens</title>\
         <style>{STYLE}</style></head><body>\
         <nav><h2>📚 PaperLens</h2>{}{}{}<hr>\
         <small>PaperLens Research Paper Analyzer v{}</small></nav>\
         <main><h1>{title}</h1>{banner_html}{body}</main></body></html>",
        link(Page::Library, "/library", "Library"),
        link(Page::Upload, "/upload", "Upload Paper"),
        link(Page::Compare, "/compare", "Compare Papers"),
        env!("CARGO_PKG_VERSION"),
        title = text(title),
    )
}

fn render_banner(banner: &Banner) -> String {
    let (class, msg) = match banner {
        Banner::Info(m) => ("info", m),
        Banner::Success(m) => ("success", m),
        Banner::Warning(m) => ("warning", m),
    };
    format!("<div class=\"banner {class}\">{}</div>", text(msg))
}

fn list_items(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("<li>{}</li>", text(i)))
        .collect()
}

pub fn library_page(session: &Session, banner: Option<&Banner>) -> String {
    let mut body = String::new();
    if session.is_empty() {
        let _ = write!(
            body,
            "{}",
            render_banner(&Banner::Info(
                "No research papers uploaded yet. Go to 'Upload Paper' to add papers.".into()
            ))
        );
        return layout(Page::Library, "📚 Research Library", banner, &body);
    }

    let stats = session.stats();
    let _ = write!(
        body,
        "<div class=\"metrics\"><div class=\"metric\">Total Papers<b>{}</b></div>\
         <div class=\"metric\">Analyzed<b>{}</b></div>\
         <div class=\"metric\">Categories<b>{}</b></div></div><hr>",
        stats.total, stats.analyzed, stats.categories
    );
    for paper in session.papers() {
        body.push_str(&paper_details(paper));
    }
    layout(Page::Library, "📚 Research Library", banner, &body)
}

fn paper_details(paper: &PaperRecord) -> String {
    let mut out = format!("<details><summary>📄 {}</summary>", text(&paper.title));
    if !paper.authors.is_empty() {
        let _ = write!(out, "<p><b>Authors:</b> {}</p>", text(&paper.authors.join(", ")));
    }
    let _ = write!(out, "<p><b>Year:</b> {}</p>", paper.year);
    if !paper.category.is_empty() {
        let _ = write!(out, "<p><span class=\"badge\">{}</span></p>", text(&paper.category));
    }
    let class = match paper.status {
        PaperStatus::Completed => "success",
        PaperStatus::Processing => "warning",
    };
    let _ = write!(out, "<p class=\"{class}\">{}</p>", paper.status.badge());
    if let Some(reason) = &paper.extraction_error {
        out.push_str(&render_banner(&Banner::Warning(format!(
            "Text extraction failed: {reason}"
        ))));
    }
    if !paper.executive_summary.is_empty() {
        let _ = write!(
            out,
            "<p><b>Executive Summary:</b></p><p>{}</p>",
            text(&paper.executive_summary)
        );
    }
    if !paper.key_findings.is_empty() {
        let _ = write!(
            out,
            "<p><b>Key Findings:</b></p><ul>{}</ul>",
            list_items(&paper.key_findings)
        );
    }
    if !paper.sections.is_empty() {
        out.push_str("<p><b>Sections:</b></p>");
        for section in &paper.sections {
            let _ = write!(
                out,
                "<p><b>{}:</b> {}</p>",
                text(&section.title),
                text(&section.summary)
            );
        }
    }
    out.push_str("</details>");
    out
}

pub fn upload_page(
    banner: Option<&Banner>,
    pending: Option<PendingUpload>,
    notes: &[String],
) -> String {
    let mut body = String::from(
        "<p>Upload your research papers (PDF format) for analysis.</p>\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\
         <input type=\"file\" name=\"files\" accept=\"application/pdf,.pdf\" multiple> \
         <button type=\"submit\">🔍 Analyze Papers</button></form>",
    );
    if let Some(PendingUpload { job, total }) = pending {
        let _ = write!(
            body,
            "<div id=\"upload-status\"></div>\
             <p><progress id=\"upload-progress\" data-job=\"{job}\" value=\"0\" max=\"{total}\">\
             </progress> <span id=\"upload-count\">0/{total}</span></p>\
             <ul id=\"upload-log\">{}</ul>{PROGRESS_SCRIPT}",
            list_items(notes)
        );
    } else if !notes.is_empty() {
        let _ = write!(body, "<ul>{}</ul>", list_items(notes));
    }
    layout(Page::Upload, "📤 Upload Research Papers", banner, &body)
}

pub fn compare_page(session: &Session, banner: Option<&Banner>) -> String {
    let limits = session.limits();
    let mut body = String::new();

    if session.papers().len() < limits.min_selection {
        body.push_str(&render_banner(&Banner::Warning(format!(
            "You need at least {} papers to compare. Upload more papers first.",
            limits.min_selection
        ))));
        return layout(Page::Compare, "🔬 Compare Research Papers", banner, &body);
    }

    let _ = write!(
        body,
        "<p>Select papers to compare and identify agreements, contradictions, \
         and research gaps.</p>\
         <form method=\"post\" action=\"/compare\" enctype=\"multipart/form-data\">\
         <fieldset><legend>Select papers to compare ({}-{} papers)</legend>",
        limits.min_selection, limits.max_selection
    );
    for paper in session.papers() {
        let checked = if session.is_selected(paper.id) { " checked" } else { "" };
        let _ = write!(
            body,
            "<label><input type=\"checkbox\" name=\"paper\" value=\"{}\"{checked}> {}</label><br>",
            attr(&paper.id.to_string()),
            text(&paper.title)
        );
    }
    body.push_str(
        "</fieldset><button type=\"submit\">🔍 Compare Selected Papers</button></form>",
    );

    if let Some(record) = session.comparison() {
        body.push_str(&comparison_section(record));
        body.push_str(
            "<form method=\"post\" action=\"/compare/reset\">\
             <button type=\"submit\">🔄 New Comparison</button></form>",
        );
    }

    layout(Page::Compare, "🔬 Compare Research Papers", banner, &body)
}

fn comparison_section(record: &ComparisonRecord) -> String {
    let analysis = &record.analysis;
    let mut out = String::from(
        "<hr><h2>📊 Comparison Analysis</h2><h3>Papers Being Compared</h3><ol>",
    );
    for paper in &record.papers {
        let _ = write!(
            out,
            "<li><b>{}</b> - {}</li>",
            text(&paper.title),
            text(&paper.authors.join(", "))
        );
    }
    out.push_str("</ol>");

    if !analysis.common_themes.is_empty() {
        out.push_str("<h3>💡 Common Themes</h3><div>");
        for theme in &analysis.common_themes {
            let _ = write!(out, "<span class=\"theme\">{}</span>", text(theme));
        }
        out.push_str("</div>");
    }
    if !analysis.agreements.is_empty() {
        out.push_str("<h3>✅ Areas of Agreement</h3>");
        for (idx, a) in analysis.agreements.iter().enumerate() {
            let _ = write!(
                out,
                "<p><b>{}. {}</b></p><p>{}</p>",
                idx + 1,
                text(&a.title),
                text(&a.description)
            );
            if !a.papers.is_empty() {
                let _ = write!(out, "<p><small>Papers: {}</small></p>", text(&a.papers.join(", ")));
            }
        }
    }
    if !analysis.contradictions.is_empty() {
        out.push_str("<h3>⚠️ Contradictions</h3>");
        for (idx, c) in analysis.contradictions.iter().enumerate() {
            let _ = write!(
                out,
                "<p><b>{}. {}</b></p><p>{}</p><ul>{}</ul>",
                idx + 1,
                text(&c.title),
                text(&c.description),
                list_items(&c.conflicting_views)
            );
        }
    }
    if !analysis.research_gaps.is_empty() {
        out.push_str("<h3>🔍 Research Gaps</h3>");
        for (idx, g) in analysis.research_gaps.iter().enumerate() {
            let _ = write!(
                out,
                "<p><b>{}. {}</b></p><p><i>Potential Impact:</i> {}</p>",
                idx + 1,
                text(&g.gap),
                text(&g.potential_impact)
            );
        }
    }
    if !analysis.unique_contributions.is_empty() {
        out.push_str("<h3>🌟 Unique Contributions</h3>");
        for c in &analysis.unique_contributions {
            let _ = write!(
                out,
                "<div class=\"banner success\"><b>{}</b>: {}</div>",
                text(&c.paper),
                text(&c.contribution)
            );
        }
    }
    out
}
