use formats::{EntryRecord, ViewerSettings};

/// Builds the popup markup for one entry.
///
/// The title links to the diary record when the entry has one, and a diary
/// image becomes a thumbnail linking to the same record. The description
/// follows with line breaks kept.
pub fn popup_html(entry: &EntryRecord, settings: &ViewerSettings) -> String {
    let mut html = String::from("<div class=\"map-popup\">");
    let title = escape_html(&entry.title);

    match &entry.diary {
        Some(diary) => {
            let href = escape_html(&settings.diary_url(diary.id));
            html.push_str(&format!("<a href=\"{href}\"><strong>{title}</strong></a>"));
            if let Some(image) = &diary.image {
                let src = escape_html(&image.url);
                let alt = escape_html(&image.description);
                html.push_str(&format!("<br><a href=\"{href}\">"));
                html.push_str(&format!(
                    "<img class=\"map-popup-thumb\" src=\"{src}\" alt=\"{alt}\">"
                ));
                html.push_str("</a>");
            }
        }
        None => html.push_str(&format!("<strong>{title}</strong>")),
    }

    if let Some(description) = entry.description() {
        let lines: Vec<String> = description.lines().map(escape_html).collect();
        html.push_str(&format!("<p>{}</p>", lines.join("<br>")));
    }

    html.push_str("</div>");
    html
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{escape_html, popup_html};
    use formats::{DiaryRef, EntryRecord, ImageRef, ViewerSettings};
    use pretty_assertions::assert_eq;

    fn entry() -> EntryRecord {
        EntryRecord {
            id: 5,
            title: "Bled & Bohinj".to_string(),
            latitude: 46.36,
            longitude: 14.09,
            gps_id: 0,
            description: None,
            diary: None,
        }
    }

    #[test]
    fn plain_title_only() {
        let html = popup_html(&entry(), &ViewerSettings::default());
        assert_eq!(
            html,
            "<div class=\"map-popup\"><strong>Bled &amp; Bohinj</strong></div>"
        );
    }

    #[test]
    fn diary_link_thumbnail_and_description() {
        let mut e = entry();
        e.description = Some("Lake walk\n<windy>".to_string());
        e.diary = Some(DiaryRef {
            id: 77,
            title: "Day 3".to_string(),
            image: Some(ImageRef {
                url: "/media/lake.jpg".to_string(),
                description: "The \"island\"".to_string(),
            }),
        });
        let html = popup_html(&e, &ViewerSettings::default());
        assert_eq!(
            html,
            "<div class=\"map-popup\">\
             <a href=\"/diary/77\"><strong>Bled &amp; Bohinj</strong></a>\
             <br><a href=\"/diary/77\"><img class=\"map-popup-thumb\" src=\"/media/lake.jpg\" \
             alt=\"The &quot;island&quot;\"></a>\
             <p>Lake walk<br>&lt;windy&gt;</p></div>"
        );
    }

    #[test]
    fn blank_description_is_skipped() {
        let mut e = entry();
        e.description = Some("   ".to_string());
        assert!(!popup_html(&e, &ViewerSettings::default()).contains("<p>"));
    }

    #[test]
    fn escapes_quotes() {
        assert_eq!(escape_html("a'b\"c"), "a&#39;b&quot;c");
    }
}
