use serde::Deserialize;

/// This struct is used to deserialize a helm chart's Chart.yaml file.
#[derive(Deserialize)]
pub(crate) struct Chart {
    /// This is the name of the helm chart.
    name: String,
    /// This is the version of the helm chart.
    version: String,
}

impl Chart {
    /// This is a getter for the helm chart name.
    pub(crate) fn name(&self) -> &str {
        self.name.as_str()
    }

    /// This is a getter for the helm chart version.
    pub(crate) fn version(&self) -> &str {
        self.version.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_yaml_parses_name_and_version() {
        let raw = "apiVersion: v2\nname: illumio\nversion: 1.2.3\ndescription: workload chart\n";
        let chart: Chart = serde_yaml::from_str(raw).unwrap();
        assert_eq!(chart.name(), "illumio");
        assert_eq!(chart.version(), "1.2.3");
    }
}
