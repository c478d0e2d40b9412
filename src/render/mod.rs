// ABOUTME: Renders nginx server blocks for a site record.
// ABOUTME: Two fixed templates, selected by site kind; variable substitution only.

use crate::site::SiteRecord;
use crate::types::{SiteKind, UpstreamProtocol};

pub const LOG_DIR: &str = "/var/log/nginx";
pub const WEB_ROOT: &str = "/var/www";
pub const DHPARAM_PATH: &str = "/etc/nginx/dhparam.pem";
pub const SSL_CIPHERS: &str = "ECDHE-RSA-AES256-GCM-SHA384:ECDHE-RSA-AES128-GCM-SHA256:ECDHE-RSA-AES256-SHA384:ECDHE-RSA-AES128-SHA256";
pub const SSL_SESSION_TIMEOUT: &str = "10m";

/// Render the configuration text for `record` using the `kind` template.
///
/// Total: a record with outstanding violations still renders, with its
/// values interpolated as given. `server_name` always carries the full
/// site name; logs, document root and the upstream group are keyed by
/// the short host name.
pub fn render(record: &SiteRecord, kind: SiteKind) -> String {
    let redirect = redirect_block(record);
    let tls = tls_directives(record);

    match kind {
        SiteKind::Proxy => {
            let (host, port, protocol) = record
                .upstream()
                .map(|u| (u.host.as_str(), u.port.as_str(), u.protocol.as_str()))
                .unwrap_or_default();
            // unrecognized schemes only reach drafts, which keep the text as given
            let protocol = protocol
                .parse::<UpstreamProtocol>()
                .map(|p| p.to_string())
                .unwrap_or_else(|()| protocol.trim().to_string());

            format!(
                r#"upstream {group} {{
    server {host}:{port};
}}

{redirect}

server {{
    listen 443 ssl;
{identity}
{tls}

    location / {{
        proxy_pass {protocol}://{group};
        proxy_redirect off;
        proxy_buffering off;
        proxy_set_header Host $host;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-Proto $scheme;
    }}
}}
"#,
                group = record.site_host_name(),
                host = host.trim(),
                port = port.trim(),
                identity = identity_directives(record),
            )
        }
        SiteKind::Local => format!(
            r#"{redirect}

server {{
    listen 443 ssl;
{identity}
{tls}

    root {web_root}/{host_name};
    index index.html index.htm;

    location / {{
        try_files $uri $uri/ /index.html;
    }}
}}
"#,
            identity = identity_directives(record),
            web_root = WEB_ROOT,
            host_name = record.site_host_name(),
        ),
    }
}

fn identity_directives(record: &SiteRecord) -> String {
    format!(
        r#"    server_name {site_name};
    access_log {log_dir}/{host_name}_access.log;
    error_log {log_dir}/{host_name}_error.log;"#,
        site_name = record.site_name(),
        log_dir = LOG_DIR,
        host_name = record.site_host_name(),
    )
}

fn redirect_block(record: &SiteRecord) -> String {
    format!(
        r#"server {{
    listen 80;
{identity}

    location / {{
        return 301 https://$host$request_uri;
    }}
}}"#,
        identity = identity_directives(record),
    )
}

fn tls_directives(record: &SiteRecord) -> String {
    format!(
        r#"
    ssl_certificate "{fullchain}";
    ssl_certificate_key "{privkey}";
    ssl_session_timeout {timeout};
    ssl_ciphers '{ciphers}';
    ssl_prefer_server_ciphers on;
    ssl_dhparam {dhparam};"#,
        fullchain = record.fullchain_path.display(),
        privkey = record.privkey_path.display(),
        timeout = SSL_SESSION_TIMEOUT,
        ciphers = SSL_CIPHERS,
        dhparam = DHPARAM_PATH,
    )
}

/// Whether every `{` in the text is closed, in order.
///
/// Rendering is total, but hostile values (a site name containing a brace)
/// can still unbalance the output; such text must not reach the server.
pub fn braces_balanced(text: &str) -> bool {
    let mut depth: usize = 0;
    for c in text.chars() {
        match c {
            '{' => depth += 1,
            '}' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}
