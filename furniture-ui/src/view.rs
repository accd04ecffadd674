/// Renders the furniture types page, one list item per type in the given order.
pub fn render_furniture_types(furniture_types: &[String]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head><title>Furniture types</title></head>\n<body>\n<h1>Furniture types</h1>\n<ul>\n",
    );
    for furniture_type in furniture_types {
        page.push_str("  <li>");
        page.push_str(&escape_html(furniture_type));
        page.push_str("</li>\n");
    }
    page.push_str("</ul>\n</body>\n</html>\n");

    page
}

pub fn render_error(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Furniture types</title></head>\n<body>\n<p>Furniture types are unavailable: {}</p>\n</body>\n</html>\n",
        escape_html(message)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_rendered_in_order() {
        let page = render_furniture_types(&[String::from("Tables"), String::from("Chairs")]);

        let tables = page.find("<li>Tables</li>").unwrap();
        let chairs = page.find("<li>Chairs</li>").unwrap();
        assert!(tables < chairs);
    }

    #[test]
    fn test_markup_is_escaped() {
        let page = render_furniture_types(&[String::from("<script>Tables & \"Chairs\"</script>")]);

        assert!(page.contains("<li>&lt;script&gt;Tables &amp; &quot;Chairs&quot;&lt;/script&gt;</li>"));
    }
}
