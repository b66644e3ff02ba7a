use std::collections::HashSet;
use std::path::Path;

const FAMILIES: [&str; 5] = ["iphone", "ipad", "macbook", "mac_desktop", "galaxy"];

fn main() {
    let catalog_path = Path::new("catalogs/device_catalog.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    // Read catalog file
    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    // Parse and validate JSON
    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let models = catalog.get("models").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'models' field\n\
             The catalog must have a top-level 'models' array.\n"
        );
    });

    let models = models.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'models' must be an array\n\
             Got: {models}\n"
        );
    });

    let total_capacities = validate_models(models);

    println!(
        "cargo:warning=Validated catalog: {} models, {total_capacities} total capacities",
        models.len()
    );
}

fn validate_models(models: &[serde_json::Value]) -> usize {
    let mut total_capacities = 0;
    let mut model_ids = HashSet::new();
    let mut capacity_ids = HashSet::new();

    for (i, model) in models.iter().enumerate() {
        let model_id = model.get("id").and_then(serde_json::Value::as_u64);
        let description = model
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        validate_model_fields(model, description, i);
        if let Some(id) = model_id {
            assert!(
                model_ids.insert(id),
                "\n\nCATALOG BUILD ERROR: Duplicate model id {id} ('{description}')\n"
            );
        }
        total_capacities += validate_model_capacities(model, description, &mut capacity_ids);
    }

    total_capacities
}

fn validate_model_fields(model: &serde_json::Value, description: &str, index: usize) {
    assert!(
        model.get("id").and_then(serde_json::Value::as_u64).is_some(),
        "\n\nCATALOG BUILD ERROR: Model at index {index} missing numeric 'id' field\n"
    );
    assert!(
        model.get("description").and_then(|v| v.as_str()).is_some(),
        "\n\nCATALOG BUILD ERROR: Model at index {index} missing 'description' field\n"
    );

    let family = model.get("family").and_then(|v| v.as_str());
    assert!(
        family.is_some_and(|f| FAMILIES.contains(&f)),
        "\n\nCATALOG BUILD ERROR: Model '{description}' (index {index}) has missing or unknown 'family'\n\
         Expected one of: {FAMILIES:?}\n"
    );
}

fn validate_model_capacities(
    model: &serde_json::Value,
    description: &str,
    seen: &mut HashSet<u64>,
) -> usize {
    let Some(capacities) = model.get("capacities").and_then(|c| c.as_array()) else {
        return 0;
    };

    for (j, capacity) in capacities.iter().enumerate() {
        let id = capacity.get("id").and_then(serde_json::Value::as_u64);
        assert!(
            id.is_some(),
            "\n\nCATALOG BUILD ERROR: Model '{description}' capacity {j} missing numeric 'id' field\n"
        );

        let label = capacity.get("label").and_then(|v| v.as_str()).unwrap_or("");
        assert!(
            label.ends_with("GB") || label.ends_with("TB"),
            "\n\nCATALOG BUILD ERROR: Model '{description}' capacity {j} has label '{label}'\n\
             Labels must look like \"256 GB\" or \"1 TB\".\n"
        );

        if let Some(id) = id {
            assert!(
                seen.insert(id),
                "\n\nCATALOG BUILD ERROR: Duplicate capacity id {id} ('{description}')\n"
            );
        }
    }
    capacities.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/device_catalog.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
