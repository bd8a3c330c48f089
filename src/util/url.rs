use url::Url;

use crate::{
    error::Error,
    types::{Database, Environment},
};

pub(crate) fn parse_endpoint(endpoint: &str) -> Result<Url, Error> {
    let endpoint = Url::parse(endpoint)
        .map_err(|_| Error::invalid_config("endpoint must be a valid absolute URL"))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(Error::invalid_config(
            "endpoint scheme must be http or https",
        ));
    }
    if endpoint.host_str().is_none() {
        return Err(Error::invalid_config("endpoint must include host"));
    }
    if endpoint.query().is_some() || endpoint.fragment().is_some() {
        return Err(Error::invalid_config(
            "endpoint must not include query or fragment",
        ));
    }
    if endpoint.path() != "/" && !endpoint.path().is_empty() {
        return Err(Error::invalid_config("endpoint must not include a path"));
    }

    Ok(endpoint)
}

/// Location of the container's database API, one segment per path component.
#[derive(Clone, Debug)]
pub(crate) struct ContainerPath {
    pub(crate) api_version: String,
    pub(crate) container: String,
    pub(crate) environment: Environment,
}

pub(crate) fn upload_urls_url(
    endpoint: &Url,
    path: &ContainerPath,
    database: Database,
    query_params: &[(String, String)],
) -> Result<Url, Error> {
    let mut url = endpoint.clone();

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| Error::invalid_config("endpoint cannot be a base URL"))?;
        segments.clear().extend([
            "database",
            path.api_version.as_str(),
            path.container.as_str(),
            path.environment.as_str(),
            database.as_str(),
            "assets",
            "upload",
        ]);
    }

    if query_params.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut()
            .clear()
            .extend_pairs(query_params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    Ok(url)
}

pub(crate) fn parse_upload_url(value: &str) -> Result<Url, Error> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_config("upload URL must not be empty"));
    }

    let url = Url::parse(value)
        .map_err(|_| Error::invalid_config("upload URL must be a valid absolute URL"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::invalid_config(
            "upload URL scheme must be http or https",
        ));
    }
    if url.host_str().is_none() {
        return Err(Error::invalid_config("upload URL must include host"));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_path() -> ContainerPath {
        ContainerPath {
            api_version: "1".to_string(),
            container: "iCloud.com.example.app".to_string(),
            environment: Environment::Development,
        }
    }

    #[test]
    fn builds_upload_urls_path_for_database() {
        let base = Url::parse("https://api.apple-cloudkit.com").unwrap();
        let url = upload_urls_url(&base, &container_path(), Database::Private, &[]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.apple-cloudkit.com/database/1/iCloud.com.example.app/development/private/assets/upload"
        );
    }

    #[test]
    fn encodes_container_segment() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let mut path = container_path();
        path.container = "a b/c".to_string();
        let url = upload_urls_url(&base, &path, Database::Public, &[]).unwrap();

        assert_eq!(
            url.path(),
            "/database/1/a%20b%2Fc/development/public/assets/upload"
        );
    }

    #[test]
    fn applies_query_params() {
        let base = Url::parse("https://api.apple-cloudkit.com").unwrap();
        let url = upload_urls_url(
            &base,
            &container_path(),
            Database::Public,
            &[("ckAPIToken".to_string(), "tok en".to_string())],
        )
        .unwrap();

        assert_eq!(url.query(), Some("ckAPIToken=tok+en"));
    }

    #[test]
    fn endpoint_validation() {
        assert!(parse_endpoint("https://api.apple-cloudkit.com").is_ok());
        assert!(parse_endpoint("https://api.apple-cloudkit.com/").is_ok());
        assert!(parse_endpoint("ftp://example.com").is_err());
        assert!(parse_endpoint("https://example.com/database").is_err());
        assert!(parse_endpoint("https://example.com?x=1").is_err());
        assert!(parse_endpoint("not a url").is_err());
    }

    #[test]
    fn upload_url_validation() {
        let url = parse_upload_url(" https://cvws.icloud-content.com/B/abc?e=1 ").unwrap();
        assert_eq!(url.host_str(), Some("cvws.icloud-content.com"));
        assert!(parse_upload_url("").is_err());
        assert!(parse_upload_url("/relative/path").is_err());
        assert!(parse_upload_url("file:///etc/passwd").is_err());
    }
}
