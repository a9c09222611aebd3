//! Kibana embed-URL composition.
//!
//! The visualization query string is opaque configuration owned by whoever
//! maintains the Kibana dashboards; this module only assembles the shared
//! embed URL around it.

/// Build the embeddable URL for a saved visualization, with a relative time
/// window such as `"30m"`.
pub fn embed_url(server: &str, visualization: &str, query: &str, window: &str) -> String {
    format!(
        "{}/#/visualize/edit/{}?embed&_g=(refreshInterval:(display:Off,pause:!f,section:0,value:0),\
         time:(from:now-{},mode:quick,to:now))&_a={}",
        server.trim_end_matches('/'),
        visualization,
        window,
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_server_visualization_and_query() {
        let url = embed_url(
            "http://kibana:5601/",
            "Analytics-Webpage-Stat",
            "(filters:!())",
            "30m",
        );
        assert!(url.starts_with("http://kibana:5601/#/visualize/edit/Analytics-Webpage-Stat?embed"));
        assert!(url.contains("from:now-30m"));
        assert!(url.ends_with("&_a=(filters:!())"));
        assert!(!url.contains("//#"));
    }
}
