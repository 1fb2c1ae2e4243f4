use actix_web::{App, HttpResponse, HttpServer, web};

pub const AUDIT_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <title>Server Rendered Page</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="canonical" href="/page">
</head>
<body>
    <h1>Server Rendered Page</h1>
    <h2>Links</h2>
    <img src="/logo.png">
    <a href="/ok">Working</a>
    <a href="/not-found">Missing</a>
    <a href="/server-error">Failing</a>
    <a href="https://example.org/" rel="nofollow noopener">Elsewhere</a>
    <a href="#top">Top</a>
</body>
</html>"##;

/// Starts a server on an ephemeral port serving the audit page and link targets.
#[allow(dead_code)]
pub async fn get_test_server_url() -> String {
    let http_server = HttpServer::new(|| {
        App::new()
            .route(
                "/page",
                web::get().to(|| async {
                    HttpResponse::Ok()
                        .content_type("text/html; charset=utf-8")
                        .append_header(("Cache-Control", "max-age=60"))
                        .body(AUDIT_PAGE)
                }),
            )
            .route(
                "/ok",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .route(
                "/not-found",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route(
                "/server-error",
                web::get().to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}
