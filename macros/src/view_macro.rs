//! view! macro: parse JSX-like syntax and generate element factory calls.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, LitStr, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// Right-hand side of an attribute.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(LitStr),
    Expr(Box<Expr>),
}

/// A parsed attribute: `name="value"` or `name={expr}`.
#[derive(Clone)]
pub(crate) struct Attribute {
    /// Name with hyphenated segments joined, e.g. `data-id`.
    pub name: String,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match &self.value {
            AttrValue::Lit(lit) => lit.value(),
            AttrValue::Expr(_) => "{..}".to_owned(),
        };
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("value", &value)
            .finish()
    }
}

/// One child inside an element body.
#[derive(Clone)]
pub(crate) enum Node {
    Element(Element),
    Text(LitStr),
    Expr(Box<Expr>),
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Element(el) => el.fmt(f),
            Node::Text(lit) => f.debug_tuple("Text").field(&lit.value()).finish(),
            Node::Expr(_) => f.write_str("Expr"),
        }
    }
}

/// A parsed element: `<tag attrs... />` or `<tag attrs...> children </tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

/// The top-level view! input: exactly one root element.
#[derive(Debug)]
struct ViewInput {
    root: Element,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for ViewInput {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::new(
                Span::call_site(),
                "view! macro requires a root element",
            ));
        }
        let root = parse_element(input)?;
        if !input.is_empty() {
            return Err(input.error("view! macro expects exactly one root element"));
        }
        Ok(ViewInput { root })
    }
}

/// Parse a possibly hyphenated name: `data-id`, `aria-label`. Keywords such
/// as `for` and `type` are accepted.
fn parse_name(input: ParseStream) -> Result<String> {
    let mut name = Ident::parse_any(input)?.to_string();
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        name.push('-');
        name.push_str(&Ident::parse_any(input)?.to_string());
    }
    Ok(name)
}

fn parse_braced_expr(input: ParseStream) -> Result<Box<Expr>> {
    let content;
    braced!(content in input);
    Ok(Box::new(content.parse()?))
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag = Ident::parse_any(input)?;

    // Attributes until `/>` or `>`.
    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element {
                tag,
                attrs,
                children: Vec::new(),
                self_closing: true,
            });
        }

        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let name = parse_name(input)?;
        input.parse::<Token![=]>()?;
        let value = if input.peek(syn::token::Brace) {
            AttrValue::Expr(parse_braced_expr(input)?)
        } else {
            AttrValue::Lit(input.parse()?)
        };
        attrs.push(Attribute { name, value });
    }

    // Children until `</tag>`.
    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag = Ident::parse_any(input)?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!(
                        "mismatched closing tag: expected `</{}>`, found `</{}>`",
                        tag, closing_tag
                    ),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(Node::Element(parse_element(input)?));
        } else if input.peek(LitStr) {
            children.push(Node::Text(input.parse()?));
        } else if input.peek(syn::token::Brace) {
            children.push(Node::Expr(parse_braced_expr(input)?));
        } else if input.is_empty() {
            return Err(input.error(format!("unclosed element: expected `</{}>`", tag)));
        } else {
            return Err(input.error(
                "expected a child element, a string literal, `{expr}`, or a closing tag",
            ));
        }
    }

    Ok(Element {
        tag,
        attrs,
        children,
        self_closing: false,
    })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

/// Generate an expression evaluating to `tidact::element::Element`.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = elem.tag.to_string();

    let attrs = elem.attrs.iter().map(|attr| {
        let name = &attr.name;
        let value = match &attr.value {
            AttrValue::Lit(lit) => quote! { #lit },
            AttrValue::Expr(expr) => quote! { #expr },
        };
        quote! {
            (
                ::std::string::String::from(#name),
                ::tidact::element::AttrValue::from(#value),
            )
        }
    });

    let children = elem.children.iter().map(|child| {
        let value = match child {
            Node::Element(el) => generate_element(el),
            Node::Text(lit) => quote! { #lit },
            Node::Expr(expr) => quote! { #expr },
        };
        quote! { ::tidact::element::Child::from(#value) }
    });

    quote! {
        ::tidact::element::create_element(
            #tag,
            ::std::vec![#(#attrs),*],
            ::std::vec![#(#children),*],
        )
    }
}

/// Entry point: generate code for the whole view! macro.
pub(crate) fn view_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: ViewInput = syn::parse2(input)?;
    Ok(generate_element(&parsed.root))
}

// ===========================================================================
// Tests
// ===========================================================================
