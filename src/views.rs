//! Server-rendered HTML for the browser flow, plus a plain-text recipe for
//! the terminal.

use chrono::{Datelike, NaiveDate};

use crate::{
    locale::{Language, Strings},
    models::Recipe,
    session::Session,
};

/// Everything a page needs besides the session itself.
#[derive(Debug, Clone, Copy)]
pub struct PageContext {
    pub language: Language,
    /// Read from the clock by the caller; drives the footer year.
    pub today: NaiveDate,
}

impl PageContext {
    #[must_use]
    pub fn strings(&self) -> &'static Strings {
        self.language.strings()
    }
}

/// Minimal HTML escaping for text and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Full page for the current session state. `notice` is shown above the
/// upload zone (used when a picked file was rejected).
#[must_use]
pub fn render_session(ctx: &PageContext, session: &Session, notice: Option<&str>) -> String {
    let s = ctx.strings();
    let mut main = String::new();

    if matches!(session, Session::Idle | Session::ImageReady { .. } | Session::Error { .. }) {
        main.push_str(&hero(s));
    }

    main.push_str(r#"<section class="action">"#);
    if let Some(n) = notice {
        main.push_str(&format!(
            r#"<p class="notice">{}</p>"#,
            escape_html(n)
        ));
    }
    match session {
        Session::Idle => main.push_str(&upload_zone(s)),
        Session::ImageReady { image } => main.push_str(&image_ready(s, image.as_str())),
        Session::Loading { .. } => main.push_str(&loader(s, false)),
        Session::Success { recipe, .. } => main.push_str(&success(s, recipe)),
        Session::Error { message } => {
            main.push_str(&alert(s, message));
            main.push_str(&upload_zone(s));
        }
    }
    main.push_str("</section>");

    layout(ctx, None, &main)
}

/// The "how it works" page.
#[must_use]
pub fn render_how_it_works(ctx: &PageContext) -> String {
    let s = ctx.strings();
    let steps: String = s
        .how_steps
        .iter()
        .map(|step| {
            format!(
                r#"<div class="step"><h3>{}</h3><p>{}</p></div>"#,
                escape_html(step.title),
                escape_html(step.text)
            )
        })
        .collect();
    let choices: String = s
        .how_upload_choices
        .iter()
        .map(|c| format!("<li>{}</li>", escape_html(c)))
        .collect();

    let main = format!(
        r#"<section class="how">
<h1>{title}</h1>
<p class="mission">{mission}</p>
<div class="steps">{steps}</div>
<div class="upload-options"><p>{options}</p><ul>{choices}</ul><p class="tip">{tip}</p></div>
<a class="button" href="/">{back}</a>
</section>"#,
        title = escape_html(s.how_title),
        mission = escape_html(s.how_mission),
        options = escape_html(s.how_upload_options),
        tip = escape_html(s.how_tip),
        back = escape_html(s.back_home),
    );

    layout(ctx, Some(s.how_title), &main)
}

/// Recipe as plain text, instructions numbered.
#[must_use]
pub fn recipe_as_text(recipe: &Recipe, s: &Strings) -> String {
    let mut out = format!("{}\n\n{}\n\n{}:\n", recipe.title, recipe.description, s.ingredients);
    for item in &recipe.ingredients {
        out.push_str(&format!("  - {item}\n"));
    }
    out.push_str(&format!("\n{}:\n", s.instructions));
    for (idx, step) in recipe.instructions.iter().enumerate() {
        out.push_str(&format!("  {}. {step}\n", idx + 1));
    }
    if let Some(tips) = recipe.tips.as_ref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("\n{}:\n", s.tips));
        for tip in tips {
            out.push_str(&format!("  * {tip}\n"));
        }
    }
    out
}

/* ---------------- sections ---------------- */

fn layout(ctx: &PageContext, title: Option<&str>, main: &str) -> String {
    let s = ctx.strings();
    let title = title.map_or_else(String::new, |t| format!("{} | ", escape_html(t)));
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}{brand_first}{brand_second}</title>
<link rel="stylesheet" href="/assets/style.css">
<script defer src="/assets/app.js"></script>
</head>
<body>
<header class="topbar">
<a class="brand" href="/">{brand_first}<span class="accent">{brand_second}</span></a>
<nav><a href="/how-it-works">{nav_how}</a></nav>
</header>
<main>
{main}
</main>
<footer>
<span class="brand">{brand_first}{brand_second}</span>
<p>&copy; {year} {brand_first}{brand_second} AI. {tagline}</p>
</footer>
</body>
</html>
"#,
        lang = ctx.language.tag(),
        brand_first = escape_html(s.brand_first),
        brand_second = escape_html(s.brand_second),
        nav_how = escape_html(s.nav_how_it_works),
        year = ctx.today.year(),
        tagline = escape_html(s.footer_tagline),
    )
}

fn hero(s: &Strings) -> String {
    format!(
        r#"<div class="hero">
<span class="badge">{badge}</span>
<h1>{title}<br><span class="accent">{accent}</span></h1>
<p>{text}</p>
</div>"#,
        badge = escape_html(s.hero_badge),
        title = escape_html(s.hero_title),
        accent = escape_html(s.hero_title_accent),
        text = escape_html(s.hero_text),
    )
}

fn upload_zone(s: &Strings) -> String {
    format!(
        r#"<form class="upload-zone" method="post" action="/upload" enctype="multipart/form-data">
<h3>{title}</h3>
<p>{text}</p>
<input type="file" name="image" accept="image/*" capture="environment" required>
<button type="submit">{button}</button>
</form>"#,
        title = escape_html(s.upload_title),
        text = escape_html(s.upload_text),
        button = escape_html(s.upload_button),
    )
}

fn image_ready(s: &Strings, data_uri: &str) -> String {
    let uri = escape_html(data_uri);
    format!(
        r#"<div class="preview">
<img src="{uri}" alt="{alt}">
<a class="clear" href="/" title="{clear}">&times;</a>
<p class="ready">{ready}</p>
</div>
<form class="generate" method="post" action="/cook">
<input type="hidden" name="photoDataUri" value="{uri}">
<button type="submit">{generate}</button>
{loader}
</form>"#,
        alt = escape_html(s.image_preview_alt),
        clear = escape_html(s.clear_image),
        ready = escape_html(s.image_ready),
        generate = escape_html(s.generate_button),
        loader = loader(s, true),
    )
}

/// `hidden` loaders sit inside the generate form and are revealed by
/// app.js when the form is submitted.
fn loader(s: &Strings, hidden: bool) -> String {
    let messages = serde_json::to_string(s.loader_messages).unwrap_or_else(|_| "[]".into());
    format!(
        r#"<div class="loader"{hidden} data-messages="{messages}">
<h3>{title}</h3>
<p class="loader-message">{first}</p>
</div>"#,
        hidden = if hidden { " hidden" } else { "" },
        messages = escape_html(&messages),
        title = escape_html(s.loader_title),
        first = escape_html(s.loader_messages.first().copied().unwrap_or_default()),
    )
}

fn alert(s: &Strings, message: &str) -> String {
    format!(
        r#"<div class="alert" role="alert">
<strong>{title}</strong>
<p>{message}</p>
<a class="dismiss" href="/">{dismiss}</a>
</div>"#,
        title = escape_html(s.alert_title),
        message = escape_html(message),
        dismiss = escape_html(s.alert_dismiss),
    )
}

fn success(s: &Strings, recipe: &Recipe) -> String {
    format!(
        r#"<div class="result-bar"><p>{banner}</p><a href="/">{new_photo}</a></div>
{card}
<div class="result-footer"><a class="button" href="/">{back}</a></div>"#,
        banner = escape_html(s.result_banner),
        new_photo = escape_html(s.new_photo),
        card = recipe_card(s, recipe),
        back = escape_html(s.back_to_kitchen),
    )
}

fn recipe_card(s: &Strings, recipe: &Recipe) -> String {
    let ingredients: String = recipe
        .ingredients
        .iter()
        .map(|i| format!("<li>{}</li>", escape_html(i)))
        .collect();
    let steps: String = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            format!(
                r#"<li><span class="step-no">{}</span><p>{}</p></li>"#,
                idx + 1,
                escape_html(step)
            )
        })
        .collect();
    let tips = match recipe.tips.as_deref() {
        Some(tips) if !tips.is_empty() => {
            let items: String = tips
                .iter()
                .map(|t| format!("<li>{}</li>", escape_html(t)))
                .collect();
            format!(
                r#"<section class="tips"><h3>{}</h3><ul>{items}</ul></section>"#,
                escape_html(s.tips)
            )
        }
        _ => String::new(),
    };

    format!(
        r#"<article class="recipe-card">
<header>
<span class="badge">{badge}</span>
<h2>{title}</h2>
<p class="description">"{description}"</p>
</header>
<section class="ingredients"><h3>{ingredients_label}</h3><ul>{ingredients}</ul></section>
<section class="instructions"><h3>{instructions_label}</h3><ol>{steps}</ol></section>
{tips}
</article>"#,
        badge = escape_html(s.card_badge),
        title = escape_html(&recipe.title),
        description = escape_html(&recipe.description),
        ingredients_label = escape_html(s.ingredients),
        instructions_label = escape_html(s.instructions),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::ImagePayload;

    fn ctx() -> PageContext {
        PageContext {
            language: Language::En,
            today: NaiveDate::from_ymd_opt(2031, 5, 4).unwrap(),
        }
    }

    fn recipe(tips: Option<Vec<String>>) -> Recipe {
        Recipe {
            title: "Mac & <Cheese>".into(),
            description: "Creamy.".into(),
            ingredients: vec!["200 g macaroni".into(), "100 g cheddar".into()],
            instructions: vec!["Boil the pasta.".into(), "Stir in the cheese.".into()],
            tips,
        }
    }

    #[test]
    fn footer_uses_injected_date() {
        let html = render_session(&ctx(), &Session::Idle, None);
        assert!(html.contains("&copy; 2031 LeftoverChef AI."));
        assert!(html.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn idle_shows_upload_form_and_notice() {
        let html = render_session(&ctx(), &Session::Idle, Some("not <an> image"));
        assert!(html.contains(r#"action="/upload""#));
        assert!(html.contains(r#"accept="image/*""#));
        assert!(html.contains("not &lt;an&gt; image"));
        assert!(!html.contains(r#"action="/cook""#));
    }

    #[test]
    fn image_ready_shows_preview_and_generate_form() {
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let html = render_session(&ctx(), &Session::ImageReady { image }, None);
        assert!(html.contains(r#"<img src="data:image/png;base64,AAAA""#));
        assert!(html.contains(r#"name="photoDataUri" value="data:image/png;base64,AAAA""#));
        assert!(html.contains("Image ready for processing"));
    }

    #[test]
    fn success_renders_escaped_card_with_numbered_steps() {
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let session = Session::Success {
            image,
            recipe: recipe(None),
        };
        let html = render_session(&ctx(), &session, None);
        assert!(html.contains("Mac &amp; &lt;Cheese&gt;"));
        assert!(html.contains(r#"<span class="step-no">2</span><p>Stir in the cheese.</p>"#));
        assert!(!html.contains(r#"class="tips""#));
        assert!(!html.contains(r#"class="hero""#));
    }

    #[test]
    fn tips_render_only_when_present() {
        let image = ImagePayload::parse("data:image/png;base64,AAAA").unwrap();
        let session = Session::Success {
            image,
            recipe: recipe(Some(vec!["Add nutmeg.".into()])),
        };
        let html = render_session(&ctx(), &session, None);
        assert!(html.contains("Chef&#39;s Secrets"));
        assert!(html.contains("<li>Add nutmeg.</li>"));
    }

    #[test]
    fn error_shows_alert_and_upload_again() {
        let session = Session::Error {
            message: "No food here.".into(),
        };
        let html = render_session(&ctx(), &session, None);
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("No food here."));
        assert!(html.contains(r#"action="/upload""#));
    }

    #[test]
    fn how_it_works_lists_steps() {
        let html = render_how_it_works(&PageContext {
            language: Language::Hu,
            today: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        });
        assert!(html.contains("Hogyan működik?"));
        assert!(html.contains("3. Főzzön"));
        assert!(html.contains("&copy; 2030 MaradékSéf AI."));
    }

    #[test]
    fn text_rendering_numbers_steps() {
        let text = recipe_as_text(&recipe(Some(vec!["Serve hot.".into()])), Language::En.strings());
        assert!(text.starts_with("Mac & <Cheese>\n\nCreamy.\n"));
        assert!(text.contains("  1. Boil the pasta.\n  2. Stir in the cheese.\n"));
        assert!(text.contains("Chef's Secrets:\n  * Serve hot.\n"));
    }
}
