use super::CodeGenerator;
use crate::descriptors::DependencyInjectionDescriptor;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;

/// An `IServiceCollection` extension method registering the client,
/// its value serializers and its result parsers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DependencyInjectionGenerator;

impl CodeGenerator<DependencyInjectionDescriptor> for DependencyInjectionGenerator {
    fn file_name(&self, descriptor: &DependencyInjectionDescriptor) -> String {
        format!("{}.cs", descriptor.class_name())
    }

    fn usings(&self) -> &'static [&'static str] {
        &["Microsoft.Extensions.DependencyInjection"]
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &DependencyInjectionDescriptor,
        _lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let client = &descriptor.client_name;
        writer.block(
            format_args!("public static partial class {}", descriptor.class_name()),
            |writer| {
                writer.block(
                    format_args!(
                        "public static IServiceCollection Add{client}(this IServiceCollection serviceCollection)"
                    ),
                    |writer| {
                        writer.block("if (serviceCollection is null)", |writer| {
                            writer.write_line(
                                "throw new ArgumentNullException(nameof(serviceCollection));",
                            )
                        })?;
                        writer.blank_line()?;
                        writer.write_line(format_args!(
                            "serviceCollection.AddSingleton<I{client}, {client}>();"
                        ))?;
                        for serializer in &descriptor.value_serializers {
                            writer.write_line(format_args!(
                                "serviceCollection.AddSingleton<IValueSerializer, {serializer}>();"
                            ))?;
                        }
                        for parser in &descriptor.result_parsers {
                            writer.write_line(format_args!(
                                "serviceCollection.AddSingleton<IResultParser, {parser}>();"
                            ))?;
                        }
                        writer.write_line("return serviceCollection;")
                    },
                )?;
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::GeneratedTypeMap;
    use crate::schema::SchemaTypes;
    use crate::CodegenOptions;
    use expect_test::expect;
    use gqlforge_scalars::Scalars;

    #[test]
    fn registrations() {
        let scalars = Scalars::default();
        let schema = SchemaTypes::new();
        let generated = GeneratedTypeMap::new();
        let lookup = TypeLookup::new(&scalars, &schema, &generated);
        let descriptor = DependencyInjectionDescriptor {
            client_name: "StarWarsClient".to_owned(),
            value_serializers: vec!["EpisodeValueSerializer".to_owned()],
            result_parsers: vec!["GetHeroResultParser".to_owned()],
        };
        assert_eq!(
            DependencyInjectionGenerator.file_name(&descriptor),
            "StarWarsClientServiceCollectionExtensions.cs"
        );
        let source = DependencyInjectionGenerator
            .generate_to_string(&descriptor, &lookup, &CodegenOptions::default())
            .unwrap();
        expect![[r#"
            public static partial class StarWarsClientServiceCollectionExtensions
            {
                public static IServiceCollection AddStarWarsClient(this IServiceCollection serviceCollection)
                {
                    if (serviceCollection is null)
                    {
                        throw new ArgumentNullException(nameof(serviceCollection));
                    }

                    serviceCollection.AddSingleton<IStarWarsClient, StarWarsClient>();
                    serviceCollection.AddSingleton<IValueSerializer, EpisodeValueSerializer>();
                    serviceCollection.AddSingleton<IResultParser, GetHeroResultParser>();
                    return serviceCollection;
                }
            }
        "#]]
        .assert_eq(&source);
    }
}
