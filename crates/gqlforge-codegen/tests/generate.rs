use crate::star_wars;
use expect_test::expect;
use gqlforge_codegen::generate_client;
use gqlforge_codegen::generators::ArtifactKind;
use gqlforge_codegen::CodegenError;
use gqlforge_codegen::CodegenOptions;
use gqlforge_codegen::GeneratedFile;
use gqlforge_scalars::Scalars;
use pretty_assertions::assert_eq;

fn generate(options: &CodegenOptions) -> Vec<GeneratedFile> {
    generate_client(&star_wars(), &Scalars::default(), options).unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], name: &str) -> &'a str {
    &files
        .iter()
        .find(|file| file.file_name == name)
        .unwrap_or_else(|| panic!("no file named {name}"))
        .source
}

fn assert_lines(source: &str, lines: &[&str]) {
    for line in lines {
        assert!(
            source.lines().any(|actual| actual.trim() == *line),
            "missing line `{line}` in:\n{source}"
        );
    }
}

#[test]
fn one_file_per_artifact() {
    let files = generate(&CodegenOptions::default());
    let names: Vec<_> = files.iter().map(|file| file.file_name.as_str()).collect();
    expect![[r#"
        [
            "IGetHero.cs",
            "IGetHero_Hero.cs",
            "IGetHero_Hero_Friends.cs",
            "GetHero.cs",
            "GetHero_Hero_Droid.cs",
            "GetHero_Hero_Human.cs",
            "GetHero_Hero_Friends_Droid.cs",
            "GetHero_Hero_Friends_Human.cs",
            "Episode.cs",
            "EpisodeValueSerializer.cs",
            "ReviewInput.cs",
            "ReviewInputSerializer.cs",
            "GetHeroQuery.cs",
            "CreateReviewQuery.cs",
            "OnReviewQuery.cs",
            "GetHeroOperation.cs",
            "CreateReviewOperation.cs",
            "OnReviewOperation.cs",
            "GetHeroResultParser.cs",
            "CreateReviewResultParser.cs",
            "IStarWarsClient.cs",
            "StarWarsClient.cs",
            "StarWarsClientServiceCollectionExtensions.cs",
        ]
    "#]]
    .assert_debug_eq(&names);
    assert_eq!(files[18].kind, ArtifactKind::ResultParser);
    assert_eq!(files[22].kind, ArtifactKind::DependencyInjection);
}

#[test]
fn files_share_the_preamble() {
    let files = generate(&CodegenOptions::new().namespace("StarWars.Client"));
    for file in &files {
        assert!(
            file.source
                .starts_with("// <auto-generated/>\n#nullable enable\n\nusing System;\n"),
            "{}",
            file.file_name
        );
        assert!(file.source.contains("\nnamespace StarWars.Client\n{\n"));
        assert!(file.source.ends_with("}\n"));
    }
    assert_lines(
        file(&files, "StarWarsClientServiceCollectionExtensions.cs"),
        &["using Microsoft.Extensions.DependencyInjection;"],
    );
    assert_lines(
        file(&files, "ReviewInputSerializer.cs"),
        &["using System.Collections;"],
    );
}

#[test]
fn custom_header_and_usings() {
    let options = CodegenOptions::new()
        .file_header("Generated for tests.\nDo not edit.")
        .using("StarWars.Shared")
        .using("System.Text.Json");
    let files = generate(&options);
    let source = file(&files, "Episode.cs");
    assert!(source.starts_with("// Generated for tests.\n// Do not edit.\n#nullable enable\n"));
    assert_eq!(source.matches("using System.Text.Json;").count(), 1);
    assert_lines(source, &["using StarWars.Shared;"]);
}

#[test]
fn data_classes_use_selection_types() {
    let files = generate(&CodegenOptions::default());
    assert_lines(
        file(&files, "GetHero_Hero_Droid.cs"),
        &[
            "public partial class GetHero_Hero_Droid : IGetHero_Hero",
            "public string Name { get; }",
            "public IReadOnlyList<Episode?> AppearsIn { get; }",
            "public IReadOnlyList<IGetHero_Hero_Friends> Friends { get; }",
            "public string PrimaryFunction { get; }",
        ],
    );
    assert_lines(
        file(&files, "GetHero_Hero_Human.cs"),
        &["public double? Height { get; }"],
    );
}

#[test]
fn client_methods() {
    let files = generate(&CodegenOptions::default());
    let interface = file(&files, "IStarWarsClient.cs");
    assert_lines(
        interface,
        &[
            "public partial interface IStarWarsClient",
            "Task<IOperationResult<IGetHero>> GetHeroAsync(",
            "Optional<Episode?> episode = default,",
            "Task<IResponseStream<IOnReview>> OnReviewAsync(",
            "OnReviewOperation operation,",
        ],
    );

    let client = file(&files, "StarWarsClient.cs");
    assert_lines(
        client,
        &[
            "public partial class StarWarsClient : IStarWarsClient",
            "private const string _clientName = \"StarWarsClient\";",
            "private readonly IOperationStreamExecutor _streamExecutor;",
            "IOperationStreamExecutorPool streamExecutorPool)",
            "Episode episode,",
            "ReviewInput review,",
            "if (review is null)",
            "throw new ArgumentNullException(nameof(review));",
            "return _executor.ExecuteAsync(",
            "return _streamExecutor.ExecuteAsync(",
            "new CreateReviewOperation",
            "Review = review",
            "cancellationToken);",
        ],
    );
    // Enums are value types
    assert!(!client.contains("if (episode is null)"));
}

#[test]
fn service_registration() {
    let files = generate(&CodegenOptions::default());
    assert_lines(
        file(&files, "StarWarsClientServiceCollectionExtensions.cs"),
        &[
            "public static IServiceCollection AddStarWarsClient(this IServiceCollection serviceCollection)",
            "serviceCollection.AddSingleton<IStarWarsClient, StarWarsClient>();",
            "serviceCollection.AddSingleton<IValueSerializer, EpisodeValueSerializer>();",
            "serviceCollection.AddSingleton<IValueSerializer, ReviewInputSerializer>();",
            "serviceCollection.AddSingleton<IResultParser, GetHeroResultParser>();",
            "serviceCollection.AddSingleton<IResultParser, CreateReviewResultParser>();",
        ],
    );
}

#[test]
fn queries_embed_their_document() {
    let files = generate(&CodegenOptions::default());
    let query = file(&files, "GetHeroQuery.cs");
    assert_lines(
        query,
        &[
            "public partial class GetHeroQuery : IDocument",
            "public static GetHeroQuery Default { get; } = new GetHeroQuery();",
            "private readonly byte[] _hash = new byte[]",
            "public ReadOnlySpan<byte> Content => _content;",
        ],
    );
    assert!(query.contains("query GetHero($episode: Episode) {"));
}

#[test]
fn dangling_references_fail_before_generation() {
    let mut model = star_wars();
    model.queries.retain(|query| query.name != "OnReviewQuery");
    let error = generate_client(&model, &Scalars::default(), &CodegenOptions::default())
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid descriptor: operation `OnReviewOperation` refers to unknown query `OnReviewQuery`"
    );
}

#[test]
fn unregistered_scalars_are_errors() {
    let scalars = Scalars::builder().build();
    let error = generate_client(&star_wars(), &scalars, &CodegenOptions::default()).unwrap_err();
    assert!(matches!(
        error,
        CodegenError::UnsupportedScalar { ref name } if name == "String"
    ));
}
