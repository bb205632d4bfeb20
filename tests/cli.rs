mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use mockito::Server;
    use predicates::str::contains;

    use std::fs;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "linkpage";

    fn site_with_pages(pages: &[(&str, String)]) -> Result<tempfile::TempDir, std::io::Error> {
        let dir = tempfile::tempdir()?;
        for (name, html) in pages {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, html)?;
        }
        Ok(dir)
    }

    #[test]
    fn test_output__when_no_subcommand() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.assert().failure().stderr(contains("Usage:"));
        Ok(())
    }

    #[test]
    fn test_output__when_output_dir_missing() -> TestResult {
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--dir", "/no/such/linkpage/public"]);

        cmd.assert()
            .code(2)
            .stderr(contains("Error: failed to extract links"))
            .stderr(contains("does not exist"));
        Ok(())
    }

    #[test]
    fn test_output__when_no_links() -> TestResult {
        let site = site_with_pages(&[("index.html", "<h1>Ride Westside</h1>".to_string())])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--dir"]).arg(site.path());

        cmd.assert()
            .success()
            .stdout(contains("No external links found."))
            .stdout(contains("✓ All links are valid!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_all_links_valid() -> TestResult {
        let mut server = Server::new_async().await;
        let _m200 = server.mock("GET", "/200").with_status(200).create_async().await;
        let site = site_with_pages(&[(
            "index.html",
            format!(r#"<a href="{}/200">ok</a>"#, server.url()),
        )])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--dir"]).arg(site.path());

        cmd.assert()
            .success()
            .stdout(contains("Found 1 unique external links to check"))
            .stdout(contains(format!("  ✓ {}/200", server.url())))
            .stdout(contains("✓ All links are valid!"));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_one_link_dead() -> TestResult {
        let mut server = Server::new_async().await;
        let _m200 = server.mock("GET", "/200").with_status(200).create_async().await;
        let _m503 = server.mock("GET", "/503").with_status(503).create_async().await;
        let site = site_with_pages(&[
            ("index.html", format!(r#"<a href="{}/200">ok</a>"#, server.url())),
            (
                "events/index.html",
                format!(r#"<a href="{}/503">down</a>"#, server.url()),
            ),
        ])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--dir"]).arg(site.path());

        cmd.assert()
            .code(1)
            .stdout(contains(format!("  ❌ {}/503", server.url())))
            .stdout(contains("❌ Found 1 dead or problematic links:"))
            .stdout(contains(format!(
                "  • {}/503\n    Status: HTTP 503\n",
                server.url()
            )));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__skipped_domain_does_not_fail() -> TestResult {
        let site = site_with_pages(&[(
            "index.html",
            r#"<a href="https://www.facebook.com/ridewestside">fb</a>"#.to_string(),
        )])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--dir"]).arg(site.path());

        cmd.assert()
            .success()
            .stdout(contains(
                "  ⊘ https://www.facebook.com/ridewestside (skipped - bot protection)",
            ))
            .stdout(contains("0 dead, 1 skipped"));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__json_report() -> TestResult {
        let mut server = Server::new_async().await;
        let _m404 = server.mock("GET", "/404").with_status(404).create_async().await;
        let site = site_with_pages(&[(
            "index.html",
            format!(r#"<a href="{}/404">gone</a>"#, server.url()),
        )])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--json", "--dir"]).arg(site.path());

        let output = cmd.output()?;
        assert_eq!(output.status.code(), Some(1));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(report["checked"], 1);
        assert_eq!(report["dead"][0]["url"], format!("{}/404", server.url()));
        assert_eq!(report["dead"][0]["reason"], "HTTP 404");
        Ok(())
    }

    #[test]
    fn test_output__zero_concurrency_rejected() -> TestResult {
        let site = site_with_pages(&[("index.html", String::new())])?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["check-links", "--no-build", "--concurrency", "0", "--dir"])
            .arg(site.path());

        cmd.assert()
            .code(2)
            .stderr(contains("--concurrency must be at least 1"));
        Ok(())
    }

    #[test]
    fn test_clean__removes_output_dir() -> TestResult {
        let site = site_with_pages(&[("index.html", String::new())])?;
        let public = site.path().join("public");
        fs::create_dir_all(&public)?;
        let mut cmd = Command::cargo_bin(NAME)?;

        cmd.args(["clean", "--dir"]).arg(&public);

        cmd.assert().success();
        assert!(!public.exists());
        Ok(())
    }
}
