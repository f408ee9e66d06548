use quote::ToTokens;

/// Renders `<ret> <name>(<params>) <where-clause>`, the description a
/// binding reports as its prototype.
///
/// A missing return type renders as `()`.
pub fn render<'a>(
    output: Option<&syn::Type>,
    name: &syn::Ident,
    params: impl Iterator<Item = &'a syn::Type>,
    where_clause: Option<&syn::WhereClause>,
) -> String {
    let ret = output.map_or_else(|| "()".to_string(), tidy);
    let params = params.map(tidy).collect::<Vec<_>>().join(", ");
    let post = where_clause.map(tidy).unwrap_or_default();

    format!("{ret} {name}({params}) {post}").trim().to_string()
}

/// Token streams print with a space between every token; this removes
/// the ones nobody would write by hand.
fn tidy(tokens: impl ToTokens) -> String {
    const JOINS: &[(&str, &str)] = &[
        (" :: ", "::"),
        (" <", "<"),
        ("< ", "<"),
        (" >", ">"),
        ("& ", "&"),
        (" ,", ","),
        ("( ", "("),
        (" )", ")"),
        ("[ ", "["),
        (" ]", "]"),
        (" ;", ";"),
        (" : ", ": "),
        ("* const ", "*const "),
        ("* mut ", "*mut "),
        ("fn (", "fn("),
        ("Fn (", "Fn("),
        ("FnMut (", "FnMut("),
        ("FnOnce (", "FnOnce("),
    ];

    let mut rendered = tokens.to_token_stream().to_string();
    if let Some(rest) = rendered.strip_prefix(":: ") {
        rendered = format!("::{rest}");
    }
    for (from, to) in JOINS {
        rendered = rendered.replace(from, to);
    }
    rendered
}
