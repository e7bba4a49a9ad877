// ABOUTME: Sequence and mapping helpers
// ABOUTME: Work on arrays and objects coming from the resolved values

use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value as Json;

use super::{strict, to_text};

handlebars_helper!(first: |list: array| list.first().cloned().unwrap_or(Json::Null));
handlebars_helper!(last: |list: array| list.last().cloned().unwrap_or(Json::Null));
handlebars_helper!(rest: |list: array| list.iter().skip(1).cloned().collect::<Vec<Json>>());
handlebars_helper!(initial: |list: array| {
    list.iter()
        .take(list.len().saturating_sub(1))
        .cloned()
        .collect::<Vec<Json>>()
});
handlebars_helper!(has: |needle: Json, list: array| list.contains(needle));
handlebars_helper!(join: |sep: str, list: array| {
    list.iter().map(to_text).collect::<Vec<_>>().join(sep)
});
handlebars_helper!(keys: |map: object| {
    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
});

pub fn register(handlebars: &mut Handlebars) {
    handlebars.register_helper("first", strict(first));
    handlebars.register_helper("last", strict(last));
    handlebars.register_helper("rest", strict(rest));
    handlebars.register_helper("initial", strict(initial));
    handlebars.register_helper("has", strict(has));
    handlebars.register_helper("join", strict(join));
    handlebars.register_helper("keys", strict(keys));
}

#[cfg(test)]
mod tests {
    use super::super::testing::render;
    use serde_json::json;

    #[test]
    fn test_list_accessors() {
        let data = json!({"items": ["a", "b", "c"], "none": []});
        assert_eq!(render("{{first items}}", &data), "a");
        assert_eq!(render("{{last items}}", &data), "c");
        assert_eq!(render("{{join \",\" (rest items)}}", &data), "b,c");
        assert_eq!(render("{{join \",\" (initial items)}}", &data), "a,b");
        assert_eq!(render("[{{first none}}]", &data), "[]");
    }

    #[test]
    fn test_join_stringifies_elements() {
        let data = json!({"ports": [80, 443]});
        assert_eq!(render("{{join \" \" ports}}", &data), "80 443");
    }

    #[test]
    fn test_has() {
        let data = json!({"envs": ["dev", "prod"]});
        let tpl = "{{#if (has \"prod\" envs)}}deploy{{else}}skip{{/if}}";
        assert_eq!(render(tpl, &data), "deploy");
    }

    #[test]
    fn test_keys_are_sorted() {
        let data = json!({"labels": {"tier": "web", "app": "shop"}});
        assert_eq!(render("{{join \",\" (keys labels)}}", &data), "app,tier");
    }
}
