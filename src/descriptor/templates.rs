//! Askama templates for each descriptor schema.
//!
//! Every substituted value goes through the HTML escaper, which covers the
//! XML special characters (`&`, `<`, `>`, `"`, `'`).
use askama::Template;

#[derive(Template)]
#[template(path = "dell/idrac6.xml", escape = "html")]
pub(super) struct Idrac6<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub arguments: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "dell/idrac7.xml", escape = "html")]
pub(super) struct Idrac7<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub arguments: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "dell/idrac8.xml", escape = "html")]
pub(super) struct Idrac8<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub arguments: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "hp/ilo.xml", escape = "html")]
pub(super) struct Ilo<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub arguments: Vec<&'a str>,
}

#[derive(Template)]
#[template(path = "supermicro/ikvm.xml", escape = "html")]
pub(super) struct Ikvm<'a> {
    pub host: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub jar_version: &'a str,
    pub native_lib_version: &'a str,
    pub arguments: Vec<&'a str>,
}
